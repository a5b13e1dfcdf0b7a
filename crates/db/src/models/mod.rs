//! Row models and write DTOs.
//!
//! Each submodule contains:
//! - A `Deserialize` + `Serialize` entity struct matching the stored row
//! - `Serialize` DTOs for inserts, updates and upserts

pub mod artist;
pub mod framework;
pub mod media;
pub mod session;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` cell like a missing one.
///
/// Array columns are nullable on the platform even though the lab always
/// writes them.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
