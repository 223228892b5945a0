// src/domain/pagination.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// total_pages = ceil(total / limit). A zero limit yields zero pages.
pub fn calculate_metadata(page: usize, limit: usize, total: usize) -> PageMetadata {
    let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };

    PageMetadata {
        page,
        limit,
        total,
        total_pages,
    }
}
