//! Domain Value Objects

use std::fmt;

use crate::error::{BlogError, BlogResult};

/// Maximum post title length in characters
pub const TITLE_MAX_LENGTH: usize = 200;

/// Maximum post or comment body length in characters
pub const CONTENT_MAX_LENGTH: usize = 50_000;

/// Post title: trimmed, 1 to 200 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(raw: impl AsRef<str>) -> BlogResult<Self> {
        let title = raw.as_ref().trim();
        if title.is_empty() {
            return Err(BlogError::validation("title", "Title is required"));
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(BlogError::validation(
                "title",
                format!("Title must be at most {TITLE_MAX_LENGTH} characters"),
            ));
        }
        if title.chars().any(char::is_control) {
            return Err(BlogError::validation("title", "Title contains invalid characters"));
        }
        Ok(Self(title.to_string()))
    }

    /// Trusted value loaded from storage
    pub fn from_db(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body text of a post or comment: non-blank, surrounding whitespace trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    pub fn new(raw: impl AsRef<str>) -> BlogResult<Self> {
        let content = raw.as_ref().trim();
        if content.is_empty() {
            return Err(BlogError::validation("content", "Content is required"));
        }
        if content.chars().count() > CONTENT_MAX_LENGTH {
            return Err(BlogError::validation(
                "content",
                format!("Content must be at most {CONTENT_MAX_LENGTH} characters"),
            ));
        }
        Ok(Self(content.to_string()))
    }

    pub fn from_db(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalized list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Number of pages needed for `total` rows
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}
