//! GET /api/debug against a stubbed model listing

mod common;

use axum::http::StatusCode;
use common::*;
use mockito::{Matcher, Server};
use serde_json::json;
use short_architect::{Config, GeminiClient, ShortError};

#[tokio::test]
async fn test_listing_is_passed_through() {
    let mut server = Server::new_async().await;
    let listing = json!({
        "models": [
            { "name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash" },
            { "name": "models/gemini-2.5-pro", "displayName": "Gemini 2.5 Pro" }
        ]
    });
    let mock = server
        .mock("GET", "/models")
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing.to_string())
        .create_async()
        .await;

    let (status, body) = get_debug(app(&server.url())).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, listing);
}

#[tokio::test]
async fn test_upstream_error_body_is_passed_through_verbatim() {
    let mut server = Server::new_async().await;
    let denied = json!({
        "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
    });
    let _mock = server
        .mock("GET", "/models")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(denied.to_string())
        .create_async()
        .await;

    let (status, body) = get_debug(app(&server.url())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, denied);
}

#[tokio::test]
async fn test_unreachable_provider_reports_error_field() {
    let (status, body) = get_debug(app(&closed_url().await)).await;

    assert_eq!(status, StatusCode::OK);
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert!(!message.contains(API_KEY), "key leaked: {}", message);
}

#[tokio::test]
async fn test_transport_errors_do_not_carry_the_api_key() {
    let config = Config::new(API_KEY, closed_url().await);
    let client = GeminiClient::new(&config).unwrap();

    let listing_err = client.list_models().await.unwrap_err();
    assert!(matches!(listing_err, ShortError::HttpError(_)));
    assert!(!listing_err.to_string().contains(API_KEY));
    assert!(!format!("{:?}", listing_err).contains(API_KEY));

    let generate_err = client.generate_script("anything").await.unwrap_err();
    assert!(matches!(generate_err, ShortError::HttpError(_)));
    assert!(!generate_err.to_string().contains(API_KEY));
}

#[tokio::test]
async fn test_non_json_listing_reports_error_field() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/models")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let (status, body) = get_debug(app(&server.url())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}
