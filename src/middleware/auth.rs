use astra::Request;

use crate::auth::{AuthService, Claims};
use crate::errors::ServerError;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &Request) -> Result<&str, ServerError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ServerError::Unauthorized("Authorization header is required".into()))?
        .to_str()
        .map_err(|_| ServerError::Unauthorized("Invalid authorization header".into()))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| ServerError::Unauthorized("Invalid authorization header format".into()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ServerError::Unauthorized(
            "Invalid authorization header format".into(),
        ));
    }
    Ok(token.trim())
}

/// Claims of the access token on `req`, or 401.
pub fn require_user(req: &Request, auth: &AuthService) -> Result<Claims, ServerError> {
    let token = bearer_token(req)?;
    Ok(auth.authenticate(token)?)
}
