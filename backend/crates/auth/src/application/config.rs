//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Access token lifetime (10 minutes)
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Longest accepted `ACCESS_TOKEN_TTL_SECS` (1 day)
pub const MAX_ACCESS_TOKEN_TTL_SECS: u64 = 24 * 3600;

/// Longest accepted `REFRESH_TOKEN_TTL_SECS` (90 days)
pub const MAX_REFRESH_TOKEN_TTL_SECS: u64 = 90 * 24 * 3600;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{var} must be base64 of exactly 32 bytes")]
    InvalidSecret { var: &'static str },

    #[error("{var} is invalid: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedTokenSecret,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 key for access tokens (32 bytes)
    pub access_token_secret: [u8; 32],
    /// HS256 key for refresh tokens, distinct from the access key (32 bytes)
    pub refresh_token_secret: [u8; 32],
    /// HMAC key binding CSRF tokens to their cookie secret (32 bytes)
    pub csrf_secret: [u8; 32],
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub refresh_cookie_name: String,
    pub csrf_cookie_name: String,
    /// Request header carrying the CSRF token
    pub csrf_header_name: String,
    /// Path attribute shared by the refresh and CSRF cookies
    pub cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: [0u8; 32],
            refresh_token_secret: [0u8; 32],
            csrf_secret: [0u8; 32],
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            refresh_cookie_name: "refresh_token".to_string(),
            csrf_cookie_name: "csrf_secret".to_string(),
            csrf_header_name: "x-csrf-token".to_string(),
            cookie_path: "/".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development and tests)
    pub fn with_random_secret() -> Self {
        Self {
            access_token_secret: random_secret(),
            refresh_token_secret: random_secret(),
            csrf_secret: random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Load from the process environment; all three secrets are required
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), true)
    }

    /// Load from the process environment, falling back to
    /// [`development`](Self::development) secrets when none are set
    pub fn from_env_or_development() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), false)
    }

    /// Load from an arbitrary key lookup
    ///
    /// Recognized keys: `JWT_ACCESS_SECRET`, `JWT_REFRESH_SECRET`,
    /// `CSRF_SECRET` and `PASSWORD_PEPPER` (base64), `ACCESS_TOKEN_TTL_SECS`,
    /// `REFRESH_TOKEN_TTL_SECS`, `COOKIE_SECURE`, `COOKIE_SAME_SITE`,
    /// `COOKIE_PATH`.
    pub fn from_lookup<F>(lookup: F, require_secrets: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets_present = ["JWT_ACCESS_SECRET", "JWT_REFRESH_SECRET", "CSRF_SECRET"]
            .iter()
            .any(|key| lookup(*key).is_some());

        let mut config = if require_secrets || secrets_present {
            Self {
                access_token_secret: read_secret(&lookup, "JWT_ACCESS_SECRET")?,
                refresh_token_secret: read_secret(&lookup, "JWT_REFRESH_SECRET")?,
                csrf_secret: read_secret(&lookup, "CSRF_SECRET")?,
                ..Default::default()
            }
        } else {
            tracing::warn!("Auth secrets not configured, using random development secrets");
            Self::development()
        };

        if config.access_token_secret == config.refresh_token_secret {
            return Err(ConfigError::SharedTokenSecret);
        }

        if let Some(ttl) = read_ttl(&lookup, "ACCESS_TOKEN_TTL_SECS", MAX_ACCESS_TOKEN_TTL_SECS)? {
            config.access_token_ttl = ttl;
        }
        if let Some(ttl) = read_ttl(&lookup, "REFRESH_TOKEN_TTL_SECS", MAX_REFRESH_TOKEN_TTL_SECS)? {
            config.refresh_token_ttl = ttl;
        }
        if let Some(value) = lookup("COOKIE_SECURE") {
            config.cookie_secure = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "COOKIE_SECURE",
                reason: format!("expected true or false, got {value}"),
            })?;
        }
        if let Some(value) = lookup("COOKIE_SAME_SITE") {
            config.cookie_same_site = value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "COOKIE_SAME_SITE",
                    reason,
                })?;
        }
        if let Some(path) = lookup("COOKIE_PATH") {
            config.cookie_path = path;
        }
        if let Some(pepper) = lookup("PASSWORD_PEPPER") {
            let bytes = platform::crypto::from_base64(&pepper).map_err(|e| {
                ConfigError::InvalidValue {
                    var: "PASSWORD_PEPPER",
                    reason: e.to_string(),
                }
            })?;
            config.password_pepper = Some(bytes);
        }

        Ok(config)
    }

    /// Access token TTL in seconds
    pub fn access_token_ttl_secs(&self) -> i64 {
        secs_i64(self.access_token_ttl)
    }

    /// Refresh token TTL in seconds
    pub fn refresh_token_ttl_secs(&self) -> i64 {
        secs_i64(self.refresh_token_ttl)
    }

    /// Cookie carrying the refresh token; Max-Age matches the token lifetime
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.cookie_path.clone(),
            max_age_secs: Some(self.refresh_token_ttl_secs()),
        }
    }

    /// Cookie carrying the CSRF secret (browser-session lifetime)
    pub fn csrf_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.csrf_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.cookie_path.clone(),
            max_age_secs: None,
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

fn random_secret() -> [u8; 32] {
    platform::crypto::random_key()
}

/// Saturates; token expiry arithmetic is checked downstream
fn secs_i64(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}

fn read_secret<F>(lookup: &F, var: &'static str) -> Result<[u8; 32], ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let encoded = lookup(var).ok_or(ConfigError::Missing(var))?;
    let bytes = platform::crypto::from_base64(encoded.trim())
        .map_err(|_| ConfigError::InvalidSecret { var })?;
    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidSecret { var })
}

/// Seconds in `1..=max`
fn read_ttl<F>(lookup: &F, var: &'static str, max: u64) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        reason: format!("expected a number of seconds, got {value}"),
    })?;
    if secs == 0 || secs > max {
        return Err(ConfigError::InvalidValue {
            var,
            reason: format!("must be between 1 and {max} seconds, got {secs}"),
        });
    }
    Ok(Some(Duration::from_secs(secs)))
}
