// responses/json.rs
use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use serde::Serialize;

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<'a, T: Serialize> {
    pub success: bool,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Serialize `data` into a success envelope.
pub fn json_response<T: Serialize>(status: u16, message: &str, data: T) -> ResultResp {
    let envelope = ApiResponse {
        success: true,
        message,
        data: Some(data),
        error: None,
    };
    let body = serde_json::to_string(&envelope)
        .map_err(|e| ServerError::Internal(format!("failed to encode response: {e}")))?;
    raw_json(status, body)
}

/// Success envelope without a data field.
pub fn message_response(status: u16, message: &str) -> ResultResp {
    let envelope: ApiResponse<'_, ()> = ApiResponse {
        success: true,
        message,
        data: None,
        error: None,
    };
    let body = serde_json::to_string(&envelope)
        .map_err(|e| ServerError::Internal(format!("failed to encode response: {e}")))?;
    raw_json(status, body)
}

pub(crate) fn raw_json(status: u16, body: String) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|e| ServerError::Internal(format!("failed to build response: {e}")))
}
