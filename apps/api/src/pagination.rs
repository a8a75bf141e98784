/// Resolved window for a paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Clamps page/limit into a usable window: page is at least 1, limit is
/// between 1 and `max_limit`, offset derives from both.
pub fn page_window(page: Option<i64>, limit: Option<i64>, default_limit: i64, max_limit: i64) -> PageWindow {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, max_limit);
    PageWindow {
        page,
        limit,
        // Saturating: page is caller-supplied and may be arbitrarily large.
        offset: page.saturating_sub(1).saturating_mul(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        let w = page_window(None, None, 20, 100);
        assert_eq!(w, PageWindow { page: 1, limit: 20, offset: 0 });
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let w = page_window(Some(1), Some(500), 20, 100);
        assert_eq!(w.limit, 100);
    }

    #[test]
    fn test_zero_and_negative_inputs_normalized() {
        let w = page_window(Some(0), Some(0), 20, 100);
        assert_eq!(w.page, 1);
        assert_eq!(w.limit, 1);
        assert_eq!(w.offset, 0);

        let w = page_window(Some(-3), Some(-10), 20, 100);
        assert_eq!(w.page, 1);
        assert_eq!(w.limit, 1);
    }

    #[test]
    fn test_huge_page_saturates_instead_of_overflowing() {
        let w = page_window(Some(i64::MAX), Some(100), 20, 100);
        assert_eq!(w.limit, 100);
        assert_eq!(w.offset, i64::MAX);

        let w = page_window(Some(i64::MAX), None, 20, 100);
        assert!(w.offset >= 0);
    }

    #[test]
    fn test_offset_skips_prior_pages() {
        let w = page_window(Some(3), Some(5), 20, 100);
        assert_eq!(w.offset, 10);
        assert_eq!(w.limit, 5);
    }
}
