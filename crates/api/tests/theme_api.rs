//! Integration tests for the `/api/v1/user/theme` endpoints.

mod common;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use common::{body_json, get, send, send_json};
use serde_json::json;

async fn get_with(app: &axum::Router, uri: &str, header: &str, value: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header, value)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn set_cookie(response: &Response) -> String {
    response.headers()[SET_COOKIE].to_str().unwrap().to_string()
}

#[tokio::test]
async fn defaults_to_light() {
    let test = common::build_test_app();
    let response = get(&test.app, "/api/v1/user/theme").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["theme"], "light");
    assert_eq!(data["source"], "default");
}

#[tokio::test]
async fn client_hint_is_used_without_a_cookie() {
    let test = common::build_test_app();
    let response = get_with(
        &test.app,
        "/api/v1/user/theme",
        "sec-ch-prefers-color-scheme",
        "\"dark\"",
    )
    .await;
    let data = &body_json(response).await["data"];
    assert_eq!(data["theme"], "dark");
    assert_eq!(data["source"], "system_preference");
}

#[tokio::test]
async fn saved_cookie_wins_over_the_hint() {
    let test = common::build_test_app();
    let request = Request::builder()
        .uri("/api/v1/user/theme")
        .header(COOKIE, "session=abc; theme=dark")
        .header("sec-ch-prefers-color-scheme", "light")
        .body(Body::empty())
        .unwrap();
    let data = &body_json(send(&test.app, request).await).await["data"];
    assert_eq!(data["theme"], "dark");
    assert_eq!(data["source"], "saved");
}

#[tokio::test]
async fn put_persists_the_choice_in_a_cookie() {
    let test = common::build_test_app();
    let response = send_json(
        &test.app,
        Method::PUT,
        "/api/v1/user/theme",
        json!({ "theme": "dark" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("theme=dark;"));
    assert!(cookie.contains("Path=/"));
    assert_eq!(body_json(response).await["data"]["theme"], "dark");
}

#[tokio::test]
async fn toggle_flips_the_current_theme() {
    let test = common::build_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/user/theme/toggle")
        .header(COOKIE, "theme=dark")
        .body(Body::empty())
        .unwrap();
    let response = send(&test.app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).starts_with("theme=light;"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/user/theme/toggle")
        .body(Body::empty())
        .unwrap();
    let response = send(&test.app, request).await;
    assert!(set_cookie(&response).starts_with("theme=dark;"));
}

#[tokio::test]
async fn unknown_theme_is_rejected() {
    let test = common::build_test_app();
    let response = send_json(
        &test.app,
        Method::PUT,
        "/api/v1/user/theme",
        json!({ "theme": "sepia" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
