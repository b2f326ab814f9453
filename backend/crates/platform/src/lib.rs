//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC-SHA256, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management (Set-Cookie building and parsing)

pub mod cookie;
pub mod crypto;
pub mod password;
