//! Display Name Value Object
//!
//! 投稿やコメントの著者として表示される名前。ログインには使用しない。
//!
//! ## 不変条件
//! - NFKC 正規化 → 前後の空白除去 の順で処理
//! - 長さ: 1〜50文字（正規化後、コードポイント単位）
//! - 制御文字を含まない

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AuthError, AuthResult};

/// Maximum length for display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> AuthResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(AuthError::validation("name", "Name cannot be empty"));
        }

        let char_count = trimmed.chars().count();
        if char_count > DISPLAY_NAME_MAX_LENGTH {
            return Err(AuthError::validation(
                "name",
                format!(
                    "Name must be at most {} characters (got {})",
                    DISPLAY_NAME_MAX_LENGTH, char_count
                ),
            ));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(AuthError::validation(
                "name",
                "Name contains invalid control characters",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trimmed() {
        let name = DisplayName::new("  Ada Lovelace ").unwrap();
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_nfkc() {
        // 全角英字・半角カナは NFKC で正規化される
        let name = DisplayName::new("Ａｄａ ｶﾅ").unwrap();
        assert_eq!(name.as_str(), "Ada カナ");
    }

    #[test]
    fn test_display_name_length_bounds() {
        assert!(DisplayName::new("a").is_ok());
        assert!(DisplayName::new("あ".repeat(DISPLAY_NAME_MAX_LENGTH)).is_ok());
        assert!(DisplayName::new("あ".repeat(DISPLAY_NAME_MAX_LENGTH + 1)).is_err());
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new(" \t ").is_err());
    }

    #[test]
    fn test_display_name_control_chars() {
        assert!(DisplayName::new("bad\u{0000}name").is_err());
        assert!(DisplayName::new("line\nbreak").is_err());
    }
}
