//! Page arithmetic

/// Number of pages for `count` rows; never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    count.div_ceil(size).max(1)
}

/// Clamp a 1-based page into `[1, total]`
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Half-open row range of a 1-based page
pub fn page_bounds(page: usize, page_size: usize, count: usize) -> (usize, usize) {
    let size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(size).min(count);
    let end = start.saturating_add(size).min(count);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(5, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 0), 1);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(3, 10, 23), (20, 23));
        assert_eq!(page_bounds(1, 10, 0), (0, 0));
    }
}
