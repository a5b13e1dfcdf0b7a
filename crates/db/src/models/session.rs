//! Session note model and DTOs.

use artlab_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A row from the `sessions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: EntityId,
    pub artist_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    pub date: Timestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    pub themes: Vec<String>,
}

/// DTO for inserting a session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSession {
    pub artist_id: EntityId,
    pub summary: String,
    pub date: Timestamp,
    pub themes: Vec<String>,
}

/// DTO for upserting a session. Without an `id` a new row is created.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub artist_id: EntityId,
    pub summary: String,
    pub date: Timestamp,
    pub themes: Vec<String>,
}
