use crate::errors::ServerError;
use crate::responses::json::{raw_json, ApiResponse, ErrorBody};
use astra::{Body, Response};
use http::StatusCode;

/// Convert a ServerError into a JSON error envelope.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    let code = err.code();

    let (message, details) = match &err {
        ServerError::Validation(fields) => (
            "Validation failed".to_string(),
            serde_json::to_value(fields).ok(),
        ),
        ServerError::Internal(_) => ("Internal server error".to_string(), None),
        other => (other.to_string(), None),
    };

    let envelope: ApiResponse<'_, ()> = ApiResponse {
        success: false,
        message: &message,
        data: None,
        error: Some(ErrorBody {
            code,
            message: message.clone(),
            details,
        }),
    };

    match serde_json::to_string(&envelope) {
        Ok(body) => raw_json(status, body).unwrap_or_else(|_| fallback(status)),
        Err(_) => fallback(status),
    }
}

fn fallback(status: u16) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    resp
}
