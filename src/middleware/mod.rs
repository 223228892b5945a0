pub mod auth;
pub mod headers;
pub mod rate_limit;

pub use auth::require_user;
pub use rate_limit::ClientRateLimiter;
