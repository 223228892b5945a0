mod auth_error;
pub mod jwt;
pub mod service;
pub mod token;

pub use auth_error::{AuthError, FieldError};
pub use jwt::{Claims, JwtService};
pub use service::{AuthService, Credentials};
