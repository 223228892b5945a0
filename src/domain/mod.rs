pub mod filter;
pub mod listing;
pub mod listing_error;
pub mod pagination;
pub mod parse;
pub mod query;

pub use listing::{ListingDetail, ListingFilter, PaginationRequest};
pub use listing_error::{ListingError, LoadError};
pub use query::ListingService;
