//! Artist entity model and DTOs.

use artlab_core::stage::Stage;
use artlab_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// An artist row from the `artists` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    /// Public URL of the avatar; empty or `null` when none was uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub project_name: String,
    pub project_description: String,
    pub campaign_statement: String,
    pub current_stage: Stage,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Artist {
    /// Avatar URL, treating the empty string as no avatar.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// DTO for inserting a new artist.
#[derive(Debug, Clone, Serialize)]
pub struct CreateArtist {
    pub name: String,
    /// Empty string when the artist has no avatar.
    pub avatar_url: String,
    pub project_name: String,
    pub project_description: String,
    pub campaign_statement: String,
    pub current_stage: Stage,
}

/// DTO for updating an artist. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateArtist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,
    /// Set by the repository on every update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_row_with_null_avatar() {
        let artist: Artist = serde_json::from_value(json!({
            "id": "6f1c3f5e-4c56-4a8e-9d55-1f5a2f0c0b11",
            "name": "Nova",
            "avatar_url": null,
            "project_name": "Night Songs",
            "project_description": "An EP",
            "campaign_statement": "Loud",
            "current_stage": "Branding",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(artist.current_stage, Stage::Branding);
        assert_eq!(artist.avatar(), None);
    }

    #[test]
    fn rejects_unknown_stage() {
        let result = serde_json::from_value::<Artist>(json!({
            "id": "6f1c3f5e-4c56-4a8e-9d55-1f5a2f0c0b11",
            "name": "Nova",
            "project_name": "p",
            "project_description": "d",
            "campaign_statement": "c",
            "current_stage": "Retired",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn update_skips_unset_fields() {
        let patch = UpdateArtist {
            name: Some("Nova".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"name": "Nova"}));
    }
}
