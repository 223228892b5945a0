// src/tests/router_tests/listing_tests.rs
use crate::tests::utils::{call, get, login_token, request, test_state};
use http::Method;
use serde_json::Value;

fn ids(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .expect("items array")
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn health_reports_listing_count() {
    let state = test_state();
    let (status, body) = call(&state, get("/health"));
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["listings"], 12);

    // Health lives at the root, not under the API base.
    let (status, _) = call(&state, get("/api/v1/health"));
    assert_eq!(status, 404);
}

#[test]
fn list_defaults_to_first_page_sorted_by_id() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings"));
    assert_eq!(status, 200);
    assert_eq!(ids(&body["data"]["items"]), (1..=10).collect::<Vec<_>>());

    let meta = &body["data"]["meta"];
    assert_eq!(meta["page"], 1);
    assert_eq!(meta["limit"], 10);
    assert_eq!(meta["total"], 12);
    assert_eq!(meta["total_pages"], 2);
}

#[test]
fn list_last_and_past_last_page() {
    let state = test_state();
    let (_, body) = call(&state, get("/api/v1/listings?page=3&limit=5"));
    assert_eq!(ids(&body["data"]["items"]), vec![11, 12]);
    assert_eq!(body["data"]["meta"]["total_pages"], 3);

    let (status, body) = call(&state, get("/api/v1/listings?page=9&limit=5"));
    assert_eq!(status, 200);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["meta"]["total"], 12);
}

#[test]
fn limit_is_clamped() {
    let state = test_state();
    let (_, body) = call(&state, get("/api/v1/listings?limit=500"));
    assert_eq!(body["data"]["meta"]["limit"], 100);

    let (_, body) = call(&state, get("/api/v1/listings?limit=0&page=-2"));
    assert_eq!(body["data"]["meta"]["limit"], 10);
    assert_eq!(body["data"]["meta"]["page"], 1);
}

#[test]
fn city_and_type_filters_combine() {
    let state = test_state();
    let (_, body) = call(&state, get("/api/v1/listings?city=lagos&property_type=FLAT"));
    assert_eq!(ids(&body["data"]["items"]), vec![1, 2, 6, 10]);
}

#[test]
fn price_filter_keeps_unpriced_listings() {
    let state = test_state();
    let (_, body) = call(
        &state,
        get("/api/v1/listings?min_price=1000000&max_price=2000000"),
    );
    // Listing 8 has no parseable price, so the price bounds don't apply to it.
    assert_eq!(ids(&body["data"]["items"]), vec![1, 2, 6, 8, 10]);
}

#[test]
fn bedroom_and_bathroom_bounds() {
    let state = test_state();
    let (_, body) = call(&state, get("/api/v1/listings?min_bedrooms=4&max_bathrooms=4"));
    assert_eq!(ids(&body["data"]["items"]), vec![4, 7, 12]);
}

#[test]
fn bad_numeric_params_are_rejected() {
    let state = test_state();
    for uri in [
        "/api/v1/listings?page=two",
        "/api/v1/listings?min_price=cheap",
        "/api/v1/listings?min_bedrooms=-1",
        "/api/v1/listings?min_price=-5",
    ] {
        let (status, body) = call(&state, get(uri));
        assert_eq!(status, 400, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[test]
fn unknown_params_are_ignored() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings?sort=desc&foo=bar"));
    assert_eq!(status, 200);
    assert_eq!(body["data"]["meta"]["total"], 12);
}

#[test]
fn search_folds_query_into_location() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/search?q=abuja"));
    assert_eq!(status, 200);
    assert_eq!(ids(&body["data"]["items"]), vec![5, 7, 11]);

    // An explicit location wins over q.
    let (_, body) = call(&state, get("/api/v1/listings/search?q=abuja&location=Lekki"));
    assert_eq!(ids(&body["data"]["items"]), vec![4, 10]);
}

#[test]
fn text_search_matches_title_location_and_type() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/search?q=flat&mode=text"));
    assert_eq!(status, 200);
    // Load order, no pagination envelope.
    assert_eq!(ids(&body["data"]), vec![1, 2, 6, 8, 10]);

    let (_, body) = call(&state, get("/api/v1/listings/search?q=PENTHOUSE&mode=text"));
    assert_eq!(ids(&body["data"]), vec![9]);

    let (status, _) = call(&state, get("/api/v1/listings/search?mode=text"));
    assert_eq!(status, 400);
}

#[test]
fn search_requires_query() {
    let state = test_state();
    for uri in ["/api/v1/listings/search", "/api/v1/listings/search?q=%20%20"] {
        let (status, body) = call(&state, get(uri));
        assert_eq!(status, 400);
        assert_eq!(body["error"]["message"], "Search query is required");
    }
}

#[test]
fn get_by_id() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/9"));
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Penthouse");
    assert_eq!(body["data"]["price"], "₦12,000,000");
    assert_eq!(body["data"]["price_numeric"], 12000000.0);
    assert_eq!(body["data"]["city"], "Lagos");
    assert_eq!(body["data"]["area"], "Victoria Island");
    assert_eq!(body["data"]["listing_type"], "For Sale");

    let (_, body) = call(&state, get("/api/v1/listings/8"));
    assert_eq!(body["data"]["price"], "N/A");
    assert_eq!(body["data"]["price_numeric"], 0.0);

    let (status, body) = call(&state, get("/api/v1/listings/999"));
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = call(&state, get("/api/v1/listings/abc"));
    assert_eq!(status, 400);
}

#[test]
fn filters_metadata() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/filters"));
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["locations"], serde_json::json!(["Abuja", "Ibadan", "Lagos"]));
    assert_eq!(data["property_types"].as_array().unwrap().len(), 7);
    assert_eq!(data["price_range"]["min"], 450000.0);
    assert_eq!(data["price_range"]["max"], 12000000.0);
    assert_eq!(data["bedroom_range"]["min"], 1);
    assert_eq!(data["bedroom_range"]["max"], 5);

    let names: Vec<&str> = data["filters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"min_price"));
    assert_eq!(data["pagination"][0]["name"], "page");
}

#[test]
fn stats_require_a_token() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/stats"));
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[test]
fn stats_with_token() {
    let state = test_state();
    let token = login_token(&state);
    let (status, body) = call(
        &state,
        request(Method::GET, "/api/v1/listings/stats", Some(&token), None),
    );
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["total_listings"], 12);
    assert_eq!(data["cities"]["Lagos"], 8);
    assert_eq!(data["cities"]["Abuja"], 3);
    assert_eq!(data["property_types"]["Flat"], 5);

    let ranges = &data["price_ranges"];
    assert_eq!(ranges["under_1m"], 2);
    assert_eq!(ranges["1m_to_2m"], 4);
    assert_eq!(ranges["2m_to_3m"], 1);
    assert_eq!(ranges["3m_to_5m"], 2);
    assert_eq!(ranges["above_5m"], 2);

    assert_eq!(data["price_stats"]["minimum"], 450000.0);
    assert_eq!(data["price_stats"]["maximum"], 12000000.0);
}

#[test]
fn similar_listings_first_n_in_load_order() {
    let state = test_state();
    let (status, body) = call(&state, get("/api/v1/listings/1/similar"));
    assert_eq!(status, 200);
    assert_eq!(ids(&body["data"]), vec![2, 6, 10]);

    let (_, body) = call(&state, get("/api/v1/listings/1/similar?limit=2"));
    assert_eq!(ids(&body["data"]), vec![2, 6]);

    let (status, _) = call(&state, get("/api/v1/listings/404/similar"));
    assert_eq!(status, 404);
}

#[test]
fn reload_without_source_is_internal_error() {
    let state = test_state();
    let token = login_token(&state);
    let (status, body) = call(
        &state,
        request(Method::POST, "/api/v1/listings/reload", Some(&token), None),
    );
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[test]
fn unknown_routes_are_json_404() {
    let state = test_state();
    for uri in [
        "/",
        "/api/v2/listings",
        "/api/v1/nope",
        "/api/v1listings",
        "/api/v1listings/1",
        "/api/v10/listings",
    ] {
        let (status, body) = call(&state, get(uri));
        assert_eq!(status, 404, "{uri}");
        assert_eq!(body["success"], false);
    }
    let (status, _) = call(&state, request(Method::DELETE, "/api/v1/listings/1", None, None));
    assert_eq!(status, 404);
}

#[test]
fn trailing_slash_is_tolerated() {
    let state = test_state();
    let (status, _) = call(&state, get("/api/v1/listings/"));
    assert_eq!(status, 200);
}
