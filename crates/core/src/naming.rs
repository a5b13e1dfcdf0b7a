//! Storage object path conventions for the `lab-upload` bucket.
//!
//! Convention:
//!
//! - avatars: `avatars/{owner_id}/{file_name}`
//! - media:   `media/{artist_id}/{file_name}`
//!
//! Files uploaded while editing get an epoch-millisecond prefix so a new
//! upload never collides with an existing object of the same name.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::EntityId;

/// Bucket holding every avatar and media object.
pub const DEFAULT_BUCKET: &str = "lab-upload";

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip any directory components a browser may have sent with the name.
///
/// ```
/// use artlab_core::naming::base_file_name;
///
/// assert_eq!(base_file_name("C:\\Users\\me\\face.png"), "face.png");
/// assert_eq!(base_file_name("../../face.png"), "face.png");
/// ```
pub fn base_file_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
}

/// `avatars/{owner_id}/{file_name}`
pub fn avatar_path(owner_id: EntityId, file_name: &str) -> String {
    format!("avatars/{owner_id}/{}", base_file_name(file_name))
}

/// `avatars/{artist_id}/{millis}_{file_name}`
pub fn timestamped_avatar_path(artist_id: EntityId, millis: i64, file_name: &str) -> String {
    format!("avatars/{artist_id}/{millis}_{}", base_file_name(file_name))
}

/// `media/{artist_id}/{file_name}`
pub fn media_path(artist_id: EntityId, file_name: &str) -> String {
    format!("media/{artist_id}/{}", base_file_name(file_name))
}

/// `media/{artist_id}/{millis}_{file_name}` with every whitespace run in the
/// file name replaced by a single underscore.
pub fn timestamped_media_path(artist_id: EntityId, millis: i64, file_name: &str) -> String {
    let name = WHITESPACE_RE.replace_all(base_file_name(file_name), "_");
    format!("media/{artist_id}/{millis}_{name}")
}

/// Recover the object path from a public URL: everything after the first
/// path segment equal to `bucket`.
///
/// Returns `None` when the URL does not reference the bucket or names no
/// object inside it.
pub fn object_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segments: Vec<&str> = without_query.split('/').collect();
    let idx = segments.iter().position(|s| *s == bucket)?;
    let path = segments[idx + 1..].join("/");
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}
