//! CSRF Guard
//!
//! Double-submit tokens bound to a per-browser secret:
//! - the secret lives in an httpOnly cookie set by `GET /csrf-token`
//! - the token is `<salt>.<mac>` with `mac = HMAC-SHA256(key, secret "." salt)`
//! - clients echo the token in a header on state-changing requests
//!
//! A cross-site attacker can make the browser send the cookie but can neither
//! read it nor forge a matching MAC.

use platform::crypto::{from_base64url, hmac_sha256, random_token, to_base64url, verify_hmac_sha256};

use crate::error::{AuthError, AuthResult};

/// Entropy of the cookie secret in bytes
const SECRET_BYTES: usize = 32;

/// Entropy of the per-token salt in bytes
const SALT_BYTES: usize = 16;

/// Issues and validates CSRF tokens
pub struct CsrfGuard {
    key: [u8; 32],
}

impl std::fmt::Debug for CsrfGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfGuard").field("key", &"[REDACTED]").finish()
    }
}

impl CsrfGuard {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Fresh cookie secret
    pub fn generate_secret(&self) -> String {
        random_token(SECRET_BYTES)
    }

    /// Token for the given cookie secret; every call uses a new salt
    pub fn issue(&self, secret: &str) -> String {
        let salt = random_token(SALT_BYTES);
        let mac = hmac_sha256(&self.key, Self::message(secret, &salt).as_bytes());
        format!("{}.{}", salt, to_base64url(&mac))
    }

    /// Validate a token against the cookie secret
    ///
    /// Missing cookie, missing header, bad shape and MAC mismatch are all the
    /// same `InvalidCsrfToken` to the client.
    pub fn verify(&self, secret: Option<&str>, token: Option<&str>) -> AuthResult<()> {
        let (Some(secret), Some(token)) = (secret, token) else {
            return Err(AuthError::InvalidCsrfToken);
        };

        let (salt, mac) = token
            .trim()
            .split_once('.')
            .ok_or(AuthError::InvalidCsrfToken)?;
        if secret.is_empty() || salt.is_empty() {
            return Err(AuthError::InvalidCsrfToken);
        }
        let mac = from_base64url(mac).map_err(|_| AuthError::InvalidCsrfToken)?;

        if verify_hmac_sha256(&self.key, Self::message(secret, salt).as_bytes(), &mac) {
            Ok(())
        } else {
            Err(AuthError::InvalidCsrfToken)
        }
    }

    fn message(secret: &str, salt: &str) -> String {
        format!("{secret}.{salt}")
    }
}
