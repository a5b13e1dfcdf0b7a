//! Integration tests for `POST /api/v1/admin/artists`.

mod common;

use artlab_db::tables;
use axum::http::{Method, StatusCode};
use common::{artist_form, body_json, create_artist, send_form, MultipartForm};

const CREATE_URI: &str = "/api/v1/admin/artists";

#[tokio::test]
async fn create_without_media_writes_one_row_per_table() {
    let test = common::build_test_app();
    let data = create_artist(&test.app, artist_form("Nova", "Night Songs")).await;

    assert_eq!(data["message"], "Artist profile created successfully!");
    assert_eq!(data["media_created"], 0);
    assert_eq!(data["media_failures"], serde_json::json!([]));
    assert_eq!(data["artist"]["current_stage"], "Ideation");
    assert_eq!(data["artist"]["avatar_url"], "");

    let artists = test.memory.rows(tables::ARTISTS).await;
    let frameworks = test.memory.rows(tables::FRAMEWORKS).await;
    let sessions = test.memory.rows(tables::SESSIONS).await;
    assert_eq!(artists.len(), 1);
    assert_eq!(frameworks.len(), 1);
    assert_eq!(sessions.len(), 1);
    assert!(test.memory.rows(tables::MEDIA).await.is_empty());

    assert_eq!(artists[0]["name"], "Nova");
    assert_eq!(artists[0]["project_name"], "Night Songs");
    assert_eq!(frameworks[0]["artist_id"], artists[0]["id"]);
    assert_eq!(frameworks[0]["goals"], serde_json::json!(["tour", "sync"]));
    assert_eq!(sessions[0]["summary"], "Kickoff call");
    assert_eq!(sessions[0]["themes"], serde_json::json!(["night", "city"]));
}

#[tokio::test]
async fn comma_lists_keep_order_and_duplicates() {
    let test = common::build_test_app();
    let data = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs").text("themes", "a, b, b"),
    )
    .await;
    assert_eq!(data["session"]["themes"], serde_json::json!(["a", "b", "b"]));
}

#[tokio::test]
async fn comma_lists_keep_empty_entries() {
    let test = common::build_test_app();
    let data = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs").text("brand", "a,,b"),
    )
    .await;
    assert_eq!(data["framework"]["brand"], serde_json::json!(["a", "", "b"]));
}

#[tokio::test]
async fn missing_required_fields_are_rejected_without_writes() {
    let test = common::build_test_app();
    let form = MultipartForm::default()
        .text("name", "Nova")
        .text("project_name", "")
        .text("current_stage", "Ideation");

    let response = send_form(&test.app, Method::POST, CREATE_URI, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Please fill in all required fields.");
    assert_eq!(
        json["fields"],
        serde_json::json!(["project_name", "project_description", "campaign_statement"])
    );
    assert!(test.memory.operations().await.is_empty());
}

#[tokio::test]
async fn invalid_stage_is_rejected() {
    let test = common::build_test_app();
    let form = artist_form("Nova", "Night Songs").text("current_stage", "Retired");
    let response = send_form(&test.app, Method::POST, CREATE_URI, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(test.memory.rows(tables::ARTISTS).await.is_empty());
}

#[tokio::test]
async fn avatar_is_stored_under_a_fresh_folder() {
    let test = common::build_test_app();
    let data = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs").file("avatar", "face.png", "image/png", b"png"),
    )
    .await;

    let paths = test.memory.object_paths().await;
    assert_eq!(paths.len(), 1);
    let segments: Vec<&str> = paths[0].split('/').collect();
    assert_eq!(segments[0], "avatars");
    assert!(uuid::Uuid::parse_str(segments[1]).is_ok());
    assert_eq!(segments[2], "face.png");

    let url = data["artist"]["avatar_url"].as_str().unwrap();
    assert!(url.ends_with(&format!("/lab-upload/{}", paths[0])));
}

#[tokio::test]
async fn avatar_upload_failure_names_the_step() {
    let test = common::build_test_app();
    test.memory.fail_uploads("avatars/", "Bucket not found").await;
    let form = artist_form("Nova", "Night Songs").file("avatar", "face.png", "image/png", b"png");

    let response = send_form(&test.app, Method::POST, CREATE_URI, form).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPLOAD_ERROR");
    assert_eq!(json["error"], "Avatar upload error: Bucket not found");
    assert!(test.memory.rows(tables::ARTISTS).await.is_empty());
}

#[tokio::test]
async fn session_failure_leaves_earlier_rows() {
    let test = common::build_test_app();
    test.memory.fail_inserts(tables::SESSIONS, "row-level security").await;

    let response = send_form(
        &test.app,
        Method::POST,
        CREATE_URI,
        artist_form("Nova", "Night Songs"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSERT_ERROR");
    assert_eq!(json["error"], "Session insert error: row-level security");
    assert_eq!(test.memory.rows(tables::ARTISTS).await.len(), 1);
    assert_eq!(test.memory.rows(tables::FRAMEWORKS).await.len(), 1);
}

#[tokio::test]
async fn failing_media_file_is_skipped_while_the_rest_succeed() {
    let test = common::build_test_app();
    test.memory.fail_uploads("broken.png", "Payload too large").await;

    let data = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs")
            .file("media", "one.png", "image/png", b"1")
            .file("media", "broken.png", "image/png", b"2")
            .file("media", "clip.mp4", "video/mp4", b"3"),
    )
    .await;

    assert_eq!(data["media_created"], 2);
    let failures = data["media_failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["file_name"], "broken.png");
    assert_eq!(failures[0]["stage"], "upload");

    let media = test.memory.rows(tables::MEDIA).await;
    let types: Vec<&str> = media.iter().map(|m| m["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["photo", "video"]);
    let artist_id = data["artist"]["id"].as_str().unwrap();
    assert!(test
        .memory
        .has_object(&format!("media/{artist_id}/clip.mp4"))
        .await);
}

#[tokio::test]
async fn empty_file_inputs_are_ignored() {
    let test = common::build_test_app();
    let data = create_artist(
        &test.app,
        artist_form("Nova", "Night Songs")
            .file("avatar", "", "application/octet-stream", b"")
            .file("media", "", "application/octet-stream", b""),
    )
    .await;
    assert_eq!(data["media_created"], 0);
    assert!(test.memory.object_paths().await.is_empty());
}
