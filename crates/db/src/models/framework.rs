//! MAS framework model and DTOs.

use artlab_core::types::EntityId;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A row from the `mas_frameworks` table: the artist's values, goals and
/// brand tags. One per artist by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasFramework {
    pub id: EntityId,
    pub artist_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: Vec<String>,
}

/// DTO for inserting a framework.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFramework {
    pub artist_id: EntityId,
    pub values: Vec<String>,
    pub goals: Vec<String>,
    pub brand: Vec<String>,
}

/// DTO for upserting a framework. Without an `id` a new row is created.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertFramework {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub artist_id: EntityId,
    pub values: Vec<String>,
    pub goals: Vec<String>,
    pub brand: Vec<String>,
}
