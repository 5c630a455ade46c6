//! Page arithmetic for 1-based page numbers

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// `ceil(total / limit)`; zero when `limit` is zero.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Offset of the first item on `page`. Page 0 is treated as page 1; pages
/// past the addressable range clamp to `u64::MAX`.
pub fn offset_for_page(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}
