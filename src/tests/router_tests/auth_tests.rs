// src/tests/router_tests/auth_tests.rs
use crate::tests::utils::{call, get, login_token, request, test_state};
use http::Method;

fn post(uri: &str, body: &str) -> astra::Request {
    request(Method::POST, uri, None, Some(body))
}

#[test]
fn demo_credentials_are_published() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/demo/credentials"));
    assert_eq!(status, 200);
    assert_eq!(body["data"]["email"], "demo@worksquare.com");
    assert_eq!(body["data"]["password"], "demo123456");
}

#[test]
fn login_returns_token_pair() {
    let state = test_state();
    let (status, body) = call(
        &state,
        post(
            "/api/v1/auth/login",
            r#"{"email":"demo@worksquare.com","password":"demo123456"}"#,
        ),
    );
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["user"]["id"], 1);
    assert_eq!(data["user"]["email"], "demo@worksquare.com");
    assert!(data["user"].get("password_hash").is_none());
    assert!(data["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(data["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(data["expires_in"], 24 * 3600);
}

#[test]
fn login_with_wrong_password_is_401() {
    let state = test_state();
    let (status, body) = call(
        &state,
        post(
            "/api/v1/auth/login",
            r#"{"email":"demo@worksquare.com","password":"not-the-one"}"#,
        ),
    );
    assert_eq!(status, 401);
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[test]
fn login_validation_errors_are_422() {
    let state = test_state();
    let (status, body) = call(
        &state,
        post("/api/v1/auth/login", r#"{"email":"nope","password":"123"}"#),
    );
    assert_eq!(status, 422);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["field"], "email");
    assert_eq!(details[1]["field"], "password");
}

#[test]
fn malformed_json_is_400() {
    let state = test_state();
    let (status, _) = call(&state, post("/api/v1/auth/login", "{not json"));
    assert_eq!(status, 400);
}

#[test]
fn oversized_body_is_rejected() {
    let state = test_state();
    let padding = "x".repeat(70 * 1024);
    let body = format!(r#"{{"email":"demo@worksquare.com","password":"{padding}"}}"#);
    let (status, resp) = call(&state, post("/api/v1/auth/login", &body));
    assert_eq!(status, 400);
    assert_eq!(resp["error"]["message"], "Request body too large");
}

#[test]
fn empty_body_fails_validation() {
    let state = test_state();
    let (status, _) = call(
        &state,
        request(Method::POST, "/api/v1/auth/register", None, None),
    );
    assert_eq!(status, 422);
}

#[test]
fn register_then_fetch_profile() {
    let state = test_state();
    let (status, body) = call(
        &state,
        post(
            "/api/v1/auth/register",
            r#"{"email":"  Ada@Example.com ","password":"s3cret!"}"#,
        ),
    );
    assert_eq!(status, 201);
    assert_eq!(body["data"]["user"]["id"], 2);
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    let (status, body) = call(
        &state,
        request(Method::GET, "/api/v1/auth/profile", Some(&token), None),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[test]
fn register_existing_email_is_409() {
    let state = test_state();
    let (status, body) = call(
        &state,
        post(
            "/api/v1/auth/register",
            r#"{"email":"DEMO@worksquare.com","password":"whatever1"}"#,
        ),
    );
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[test]
fn refresh_issues_new_pair() {
    let state = test_state();
    let (_, login) = call(
        &state,
        post(
            "/api/v1/auth/login",
            r#"{"email":"demo@worksquare.com","password":"demo123456"}"#,
        ),
    );
    let refresh = login["data"]["refresh_token"].as_str().unwrap();
    let access = login["data"]["access_token"].as_str().unwrap();

    let (status, body) = call(
        &state,
        post(
            "/api/v1/auth/refresh",
            &format!(r#"{{"refresh_token":"{refresh}"}}"#),
        ),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["user"]["id"], 1);

    // An access token is not accepted as a refresh token.
    let (status, _) = call(
        &state,
        post(
            "/api/v1/auth/refresh",
            &format!(r#"{{"refresh_token":"{access}"}}"#),
        ),
    );
    assert_eq!(status, 401);
}

#[test]
fn refresh_without_token_is_400() {
    let state = test_state();
    let (status, body) = call(&state, post("/api/v1/auth/refresh", "{}"));
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "Refresh token is required");

    let (status, _) = call(
        &state,
        post("/api/v1/auth/refresh", r#"{"refresh_token":"garbage"}"#),
    );
    assert_eq!(status, 401);
}

#[test]
fn refresh_token_is_not_a_bearer_token() {
    let state = test_state();
    let (_, login) = call(
        &state,
        post(
            "/api/v1/auth/login",
            r#"{"email":"demo@worksquare.com","password":"demo123456"}"#,
        ),
    );
    let refresh = login["data"]["refresh_token"].as_str().unwrap();
    let (status, _) = call(
        &state,
        request(Method::GET, "/api/v1/auth/profile", Some(refresh), None),
    );
    assert_eq!(status, 401);
}

#[test]
fn profile_and_logout_need_auth() {
    let state = test_state();
    assert_eq!(call(&state, get("/api/v1/auth/profile")).0, 401);
    assert_eq!(
        call(&state, request(Method::POST, "/api/v1/auth/logout", None, None)).0,
        401
    );

    let token = login_token(&state);
    let (status, body) = call(
        &state,
        request(Method::POST, "/api/v1/auth/logout", Some(&token), None),
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body.get("data").is_none());
}
