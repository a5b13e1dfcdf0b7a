//! Artist project stage.
//!
//! Stored in the `artists.current_stage` column as the capitalised stage
//! name. The enum is closed, so a row can never carry any other value.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Where an artist's project currently sits in the lab pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Ideation,
    Branding,
    Production,
    Launch,
}

impl Stage {
    /// Every stage in pipeline order.
    pub const ALL: [Stage; 4] = [
        Stage::Ideation,
        Stage::Branding,
        Stage::Production,
        Stage::Launch,
    ];

    /// Parse from the stored column value. Surrounding whitespace is ignored,
    /// case is not.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim() {
            "Ideation" => Ok(Self::Ideation),
            "Branding" => Ok(Self::Branding),
            "Production" => Ok(Self::Production),
            "Launch" => Ok(Self::Launch),
            other => Err(CoreError::Validation(format!(
                "Invalid stage '{other}'. Must be one of: Ideation, Branding, Production, Launch"
            ))),
        }
    }

    /// Column value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ideation => "Ideation",
            Self::Branding => "Branding",
            Self::Production => "Production",
            Self::Launch => "Launch",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
