//! Token Issuer
//!
//! Mints and verifies the two stateless token classes. Each class has its own
//! HS256 key, so a refresh token can never pass as an access token even if the
//! class claim were ignored.

use chrono::Utc;
use derive_more::Display;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::claims::Claims;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Distinguishes access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    #[display("access")]
    Access,
    #[display("refresh")]
    Refresh,
}

/// JWT payload shared by both classes
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,
    email: String,
    role: UserRole,
    iat: i64,
    exp: i64,
    typ: TokenClass,
}

/// Freshly minted access + refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the refresh token expires; the cookie Max-Age
    pub refresh_max_age_secs: i64,
}

/// A verified refresh token
///
/// `expires_at` is the session deadline. Rotation never moves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    pub claims: Claims,
    pub expires_at: i64,
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

/// Signs and verifies access and refresh tokens
pub struct TokenIssuer {
    access: ClassKeys,
    refresh: ClassKeys,
    validation: Validation,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_secs", &self.access.ttl_secs)
            .field("refresh_ttl_secs", &self.refresh.ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand so that `exp == now` is already expired
        // and so expiry can be told apart from tampering.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            access: ClassKeys {
                encoding: EncodingKey::from_secret(&config.access_token_secret),
                decoding: DecodingKey::from_secret(&config.access_token_secret),
                ttl_secs: config.access_token_ttl_secs(),
            },
            refresh: ClassKeys {
                encoding: EncodingKey::from_secret(&config.refresh_token_secret),
                decoding: DecodingKey::from_secret(&config.refresh_token_secret),
                ttl_secs: config.refresh_token_ttl_secs(),
            },
            validation,
        }
    }

    fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    pub fn issue_access_token(&self, claims: &Claims) -> AuthResult<String> {
        self.issue_at(claims, TokenClass::Access, Utc::now().timestamp())
    }

    pub fn issue_refresh_token(&self, claims: &Claims) -> AuthResult<String> {
        self.issue_at(claims, TokenClass::Refresh, Utc::now().timestamp())
    }

    /// Mint both tokens for a new session
    pub fn issue_pair(&self, claims: &Claims) -> AuthResult<TokenPair> {
        let now = Utc::now().timestamp();
        Ok(TokenPair {
            access_token: self.issue_at(claims, TokenClass::Access, now)?,
            refresh_token: self.issue_at(claims, TokenClass::Refresh, now)?,
            refresh_max_age_secs: self.refresh.ttl_secs,
        })
    }

    /// Mint both tokens for an existing session
    pub fn rotate_pair(&self, claims: &Claims, session_expires_at: i64) -> AuthResult<TokenPair> {
        self.rotate_pair_at(claims, session_expires_at, Utc::now().timestamp())
    }

    /// Rotate as if the clock read `now`; neither token outlives the session
    pub fn rotate_pair_at(
        &self,
        claims: &Claims,
        session_expires_at: i64,
        now: i64,
    ) -> AuthResult<TokenPair> {
        if session_expires_at <= now {
            return Err(AuthError::RefreshExpired);
        }
        let access_exp = self.expiry(TokenClass::Access, now)?.min(session_expires_at);
        let refresh_exp = self.expiry(TokenClass::Refresh, now)?.min(session_expires_at);

        Ok(TokenPair {
            access_token: self.encode(claims, TokenClass::Access, now, access_exp)?,
            refresh_token: self.encode(claims, TokenClass::Refresh, now, refresh_exp)?,
            refresh_max_age_secs: refresh_exp - now,
        })
    }

    /// Mint a token as if the clock read `now` (unix seconds)
    pub fn issue_at(&self, claims: &Claims, class: TokenClass, now: i64) -> AuthResult<String> {
        let exp = self.expiry(class, now)?;
        self.encode(claims, class, now, exp)
    }

    fn expiry(&self, class: TokenClass, now: i64) -> AuthResult<i64> {
        now.checked_add(self.keys(class).ttl_secs)
            .ok_or_else(|| AuthError::Internal(format!("{class} token expiry out of range")))
    }

    fn encode(&self, claims: &Claims, class: TokenClass, iat: i64, exp: i64) -> AuthResult<String> {
        let payload = JwtClaims {
            sub: claims.user_id.into_uuid(),
            email: claims.email.as_str().to_string(),
            role: claims.role,
            iat,
            exp,
            typ: class,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.keys(class).encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to encode {class} token: {e}")))
    }

    pub fn verify(&self, token: &str, class: TokenClass) -> AuthResult<Claims> {
        self.verify_at(token, class, Utc::now().timestamp())
    }

    /// Verify against the clock reading `now` (unix seconds)
    ///
    /// `MalformedToken` for a bad signature, shape, or class; `ExpiredToken`
    /// when `exp <= now`.
    pub fn verify_at(&self, token: &str, class: TokenClass, now: i64) -> AuthResult<Claims> {
        self.decode_at(token, class, now).map(|(claims, _)| claims)
    }

    /// Verify a refresh token and keep its deadline
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshSession> {
        self.verify_refresh_at(token, Utc::now().timestamp())
    }

    pub fn verify_refresh_at(&self, token: &str, now: i64) -> AuthResult<RefreshSession> {
        let (claims, expires_at) = self.decode_at(token, TokenClass::Refresh, now)?;
        Ok(RefreshSession { claims, expires_at })
    }

    /// Claims and `exp` of a valid token
    fn decode_at(&self, token: &str, class: TokenClass, now: i64) -> AuthResult<(Claims, i64)> {
        let data = decode::<JwtClaims>(token, &self.keys(class).decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, token_class = %class, "Token rejected");
                AuthError::MalformedToken
            })?;
        let payload = data.claims;

        if payload.typ != class {
            return Err(AuthError::MalformedToken);
        }
        if payload.exp <= now {
            return Err(AuthError::ExpiredToken);
        }

        let claims = Claims {
            user_id: UserId::from_uuid(payload.sub),
            email: Email::from_db(payload.email),
            role: payload.role,
        };
        Ok((claims, payload.exp))
    }
}
