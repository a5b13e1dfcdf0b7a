//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&dyn TableStore` as the first argument.

pub mod artist_repo;
pub mod framework_repo;
pub mod media_repo;
pub mod session_repo;

pub use artist_repo::ArtistRepo;
pub use framework_repo::FrameworkRepo;
pub use media_repo::MediaRepo;
pub use session_repo::SessionRepo;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::BackendError;

/// Serialize a DTO into a row object.
pub(crate) fn encode<T: Serialize>(table: &str, input: &T) -> Result<Value, BackendError> {
    serde_json::to_value(input).map_err(|source| BackendError::Codec {
        table: table.to_string(),
        source,
    })
}

/// Decode every returned row into a model.
pub(crate) fn decode_rows<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| BackendError::Codec {
                table: table.to_string(),
                source,
            })
        })
        .collect()
}

/// Decode the first returned row, if any.
pub(crate) fn first_row<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
) -> Result<Option<T>, BackendError> {
    Ok(decode_rows(table, rows.into_iter().take(1).collect())?
        .into_iter()
        .next())
}

/// Decode the single row a write must return.
pub(crate) fn returned_row<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
) -> Result<T, BackendError> {
    first_row(table, rows)?.ok_or_else(|| BackendError::EmptyResult {
        table: table.to_string(),
    })
}
