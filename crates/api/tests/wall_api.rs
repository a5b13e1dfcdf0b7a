//! Integration tests for the public wall endpoints.

mod common;

use axum::http::StatusCode;
use common::{artist_form, body_json, create_artist, get};

#[tokio::test]
async fn wall_lists_every_artist() {
    let test = common::build_test_app();

    let json = body_json(get(&test.app, "/api/v1/wall/artists").await).await;
    assert_eq!(json["data"], serde_json::json!([]));

    create_artist(&test.app, artist_form("Nova", "Night Songs")).await;
    create_artist(&test.app, artist_form("Rhea", "Tidal")).await;

    let response = get(&test.app, "/api/v1/wall/artists").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Nova") && names.contains(&"Rhea"));
}

#[tokio::test]
async fn profile_includes_framework_sessions_and_grouped_media() {
    let test = common::build_test_app();
    let created = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs")
            .file("media", "cover.png", "image/png", b"png")
            .file("media", "teaser.mp4", "video/mp4", b"mp4")
            .file("media", "press kit.pdf", "application/pdf", b"pdf"),
    )
    .await;
    let id = created["artist"]["id"].as_str().unwrap();

    let response = get(&test.app, &format!("/api/v1/wall/artists/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = &body_json(response).await["data"];

    assert_eq!(profile["artist"]["name"], "Nova");
    assert_eq!(profile["framework"]["values"], serde_json::json!(["honesty", "craft"]));
    assert_eq!(profile["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(profile["media"].as_array().unwrap().len(), 3);

    let groups = &profile["media_by_kind"];
    assert_eq!(groups["image"][0]["file_name"], "cover.png");
    assert_eq!(groups["video"][0]["type"], "video");
    // Documents are stored as photos, so they render in the image group.
    assert_eq!(groups["image"][1]["file_name"], "press kit.pdf");
    assert_eq!(groups["image"][1]["extension"], "PDF");
    assert_eq!(groups["document"], serde_json::json!([]));
    assert_eq!(groups["other"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let test = common::build_test_app();
    let response = get(
        &test.app,
        &format!("/api/v1/wall/artists/{}", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Artist not found");
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let test = common::build_test_app();
    let response = get(&test.app, "/api/v1/wall/artists/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
