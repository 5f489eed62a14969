use serde::Serialize;

use super::error::ApiError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// Validates raw `page`/`per_page` query values, applying defaults.
pub fn page_params(page: Option<i64>, per_page: Option<i64>) -> Result<(i64, i64), ApiError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

    if page < 1 {
        return Err(ApiError::validation("page", "page must be at least 1"));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ApiError::validation(
            "per_page",
            format!("per_page must be between 1 and {MAX_PER_PAGE}"),
        ));
    }
    if page.checked_mul(per_page).is_none() {
        return Err(ApiError::validation("page", "page is too large"));
    }
    Ok((page, per_page))
}

/// Rows to skip before `page`.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        Self {
            total,
            page,
            per_page,
            has_next: page.saturating_mul(per_page) < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(page_params(None, None).unwrap(), (1, 10));
    }

    #[test]
    fn test_out_of_range() {
        assert!(page_params(Some(0), None).is_err());
        assert!(page_params(None, Some(0)).is_err());
        assert!(page_params(None, Some(101)).is_err());
        assert_eq!(page_params(Some(3), Some(100)).unwrap(), (3, 100));
    }

    #[test]
    fn test_flags() {
        let meta = PageMeta::new(25, 1, 10);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let meta = PageMeta::new(25, 3, 10);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let meta = PageMeta::new(20, 2, 10);
        assert!(!meta.has_next);

        let meta = PageMeta::new(0, 1, 10);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_huge_page_is_rejected() {
        let err = page_params(Some(i64::MAX), Some(10)).unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field.as_deref() == Some("page")));
        assert_eq!(page_offset(i64::MAX, 10), i64::MAX);
        assert_eq!(page_offset(3, 10), 20);
        assert!(!PageMeta::new(0, i64::MAX, 10).has_next);
    }
}
