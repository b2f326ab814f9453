//! Application Configuration
//!
//! Configuration for the blog application layer.

use crate::domain::value_objects::Pagination;

/// Blog application configuration
#[derive(Debug, Clone)]
pub struct BlogConfig {
    /// Page size when the client sends none
    pub default_page_size: u32,
    /// Upper bound on the client's page size
    pub max_page_size: u32,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl BlogConfig {
    /// Normalize raw `page` / `limit` query values
    ///
    /// Unparsable or non-positive values fall back to the defaults; the limit
    /// is capped at `max_page_size`.
    pub fn pagination(&self, page: Option<&str>, limit: Option<&str>) -> Pagination {
        let parse = |raw: Option<&str>| {
            raw.and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
        };

        Pagination {
            page: parse(page).unwrap_or(1),
            limit: parse(limit)
                .unwrap_or(self.default_page_size)
                .min(self.max_page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let config = BlogConfig::default();
        assert_eq!(config.pagination(None, None), Pagination { page: 1, limit: 20 });
        assert_eq!(
            config.pagination(Some("abc"), Some("-5")),
            Pagination { page: 1, limit: 20 }
        );
        assert_eq!(
            config.pagination(Some("0"), Some("0")),
            Pagination { page: 1, limit: 20 }
        );
    }

    #[test]
    fn test_pagination_explicit_and_capped() {
        let config = BlogConfig::default();
        assert_eq!(
            config.pagination(Some("3"), Some("5")),
            Pagination { page: 3, limit: 5 }
        );
        assert_eq!(
            config.pagination(Some("1"), Some("1000")),
            Pagination { page: 1, limit: 100 }
        );
    }
}
