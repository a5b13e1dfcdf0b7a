//! Media model and DTOs.

use artlab_core::media::MediaType;
use artlab_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// A row from the `media` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: EntityId,
    pub artist_id: EntityId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Public URL of the stored object.
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a media row.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMedia {
    pub artist_id: EntityId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_name: String,
}
