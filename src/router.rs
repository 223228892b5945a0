use crate::auth::Credentials;
use crate::domain::{ListingDetail, ListingFilter, PaginationRequest};
use crate::errors::{ResultResp, ServerError};
use crate::middleware::{headers, require_user};
use crate::responses::{error_to_response, json_response, message_response};
use crate::state::AppState;
use astra::{Request, Response};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;
use std::net::IpAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_BODY_BYTES: u64 = 64 * 1024;
const DEFAULT_SIMILAR_LIMIT: usize = 5;
const MAX_SIMILAR_LIMIT: usize = 100;

/// Preflight, rate limit, route, render errors, add headers, log.
/// A panicking handler becomes a 500. Never fails.
pub fn respond(req: Request, peer: Option<IpAddr>, state: &AppState) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut resp = if method == http::Method::OPTIONS {
        headers::preflight()
    } else if !state.limiter.check(peer) {
        warn!(peer = ?peer, %method, path = %path, "rate limit exceeded");
        error_to_response(ServerError::TooManyRequests)
    } else {
        match catch_unwind(AssertUnwindSafe(|| handle(req, state))) {
            Ok(result) => result.unwrap_or_else(error_to_response),
            Err(_) => {
                error!(%method, path = %path, "handler panicked");
                error_to_response(ServerError::Internal("handler panicked".into()))
            }
        }
    };
    headers::apply(&mut resp);

    info!(
        %method,
        path = %path,
        status = resp.status().as_u16(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        peer = ?peer,
        "request"
    );
    resp
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().trim_end_matches('/').to_string();

    if method == "GET" && path == "/health" {
        return health(state);
    }

    let rest = path
        .strip_prefix(state.api_base.as_str())
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(|| ServerError::NotFound("Route not found".into()))?;
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["listings"]) => {
            let params = parse_query(&req);
            let page = state
                .listings
                .list_page(&filter_from(&params)?, pagination_from(&params)?)?;
            json_response(200, "Listings retrieved successfully", page)
        }
        ("GET", ["listings", "search"]) => {
            let params = parse_query(&req);
            let query = params.get("q").map(String::as_str).unwrap_or("");
            if query.trim().is_empty() {
                return Err(ServerError::BadRequest("Search query is required".into()));
            }
            if params.get("mode").map(String::as_str) == Some("text") {
                let hits = state.listings.search_text(query);
                return json_response(200, "Search results retrieved successfully", hits);
            }
            let page = state.listings.search(
                query,
                &filter_from(&params)?,
                pagination_from(&params)?,
            )?;
            json_response(200, "Search results retrieved successfully", page)
        }
        ("GET", ["listings", "filters"]) => json_response(
            200,
            "Filter options retrieved successfully",
            state.listings.filters_metadata(),
        ),
        ("GET", ["listings", "stats"]) => {
            require_user(&req, &state.auth)?;
            json_response(
                200,
                "Statistics retrieved successfully",
                state.listings.stats(),
            )
        }
        ("POST", ["listings", "reload"]) => {
            let claims = require_user(&req, &state.auth)?;
            let count = state.listings.reload()?;
            info!(user_id = claims.user_id, count, "reload requested");
            json_response(200, "Listings reloaded", json!({ "count": count }))
        }
        ("GET", ["listings", id]) => {
            let listing = state.listings.get_by_id(parse_id(id)?)?;
            json_response(
                200,
                "Listing retrieved successfully",
                ListingDetail::from(&listing),
            )
        }
        ("GET", ["listings", id, "similar"]) => {
            let id = parse_id(id)?;
            let params = parse_query(&req);
            let limit = match param::<i64>(&params, "limit")? {
                Some(n) if n > 0 => usize::try_from(n)
                    .unwrap_or(MAX_SIMILAR_LIMIT)
                    .min(MAX_SIMILAR_LIMIT),
                _ => DEFAULT_SIMILAR_LIMIT,
            };
            let similar = state.listings.similar_listings(id, limit)?;
            json_response(200, "Similar listings retrieved successfully", similar)
        }

        ("POST", ["auth", "login"]) => {
            let creds: Credentials = read_json(req)?;
            json_response(200, "Login successful", state.auth.login(&creds)?)
        }
        ("POST", ["auth", "register"]) => {
            let creds: Credentials = read_json(req)?;
            json_response(201, "User registered successfully", state.auth.register(&creds)?)
        }
        ("POST", ["auth", "refresh"]) => {
            let body: RefreshRequest = read_json(req)?;
            let token = body.refresh_token.trim();
            if token.is_empty() {
                return Err(ServerError::BadRequest("Refresh token is required".into()));
            }
            json_response(200, "Token refreshed successfully", state.auth.refresh(token)?)
        }
        ("GET", ["auth", "profile"]) => {
            let claims = require_user(&req, &state.auth)?;
            json_response(
                200,
                "Profile retrieved successfully",
                state.auth.profile(claims.user_id)?,
            )
        }
        ("POST", ["auth", "logout"]) => {
            require_user(&req, &state.auth)?;
            message_response(200, "Logout successful")
        }

        ("GET", ["demo", "credentials"]) => json_response(
            200,
            "Demo credentials",
            json!({
                "email": state.config.demo_user_email,
                "password": state.config.demo_user_password,
            }),
        ),

        _ => Err(ServerError::NotFound("Route not found".into())),
    }
}

#[derive(Debug, Default, Deserialize)]
struct RefreshRequest {
    #[serde(default)]
    refresh_token: String,
}

fn health(state: &AppState) -> ResultResp {
    json_response(
        200,
        "Worksquare Housing API is running!",
        json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "environment": state.config.environment,
            "version": state.config.api_version,
            "listings": state.listings.total(),
        }),
    )
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// `None` when absent or blank, 400 when present but unparseable.
fn param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, ServerError> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("Invalid value for {key}: {raw}"))),
    }
}

fn text(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn filter_from(params: &HashMap<String, String>) -> Result<ListingFilter, ServerError> {
    Ok(ListingFilter {
        location: text(params, "location"),
        property_type: text(params, "property_type"),
        city: text(params, "city"),
        min_price: param(params, "min_price")?,
        max_price: param(params, "max_price")?,
        min_bedrooms: param(params, "min_bedrooms")?,
        max_bedrooms: param(params, "max_bedrooms")?,
        min_bathrooms: param(params, "min_bathrooms")?,
        max_bathrooms: param(params, "max_bathrooms")?,
    })
}

fn pagination_from(params: &HashMap<String, String>) -> Result<PaginationRequest, ServerError> {
    Ok(PaginationRequest::new(
        param(params, "page")?.unwrap_or(0),
        param(params, "limit")?.unwrap_or(0),
    ))
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest("Invalid listing ID".into()))
}

/// Bodies over `MAX_BODY_BYTES` are rejected; blank bodies give `T::default()`.
fn read_json<T: DeserializeOwned + Default>(req: Request) -> Result<T, ServerError> {
    let mut buf = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read request body: {e}")))?;

    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("Request body too large".into()));
    }

    if buf.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&buf).map_err(|_| ServerError::BadRequest("Invalid request body".into()))
}
