// middleware/headers.rs
use astra::{Body, Response};
use http::header::{HeaderName, HeaderValue};

pub const ALLOW_METHODS: &str = "GET,POST,HEAD,PUT,DELETE,PATCH";
pub const ALLOW_HEADERS: &str = "Origin,Content-Type,Accept,Authorization";

const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", ALLOW_METHODS),
    ("access-control-allow-headers", ALLOW_HEADERS),
];

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-xss-protection", "0"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
    ("cross-origin-opener-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
];

/// Adds CORS and security headers, keeping any the handler already set.
pub fn apply(resp: &mut Response) {
    let headers = resp.headers_mut();
    for &(name, value) in CORS_HEADERS.iter().chain(SECURITY_HEADERS) {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert(HeaderValue::from_static(value));
    }
}

/// Empty 204 answer to a CORS preflight.
pub fn preflight() -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = http::StatusCode::NO_CONTENT;
    resp
}
