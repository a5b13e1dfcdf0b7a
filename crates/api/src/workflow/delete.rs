//! Delete an artist together with its stored media objects.

use artlab_core::naming::object_path_from_url;
use artlab_core::types::EntityId;
use artlab_db::repositories::{ArtistRepo, MediaRepo};
use artlab_db::Backend;
use serde::Serialize;

use super::{Step, WorkflowError};

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub artist_id: EntityId,
    /// Storage objects removed.
    pub objects_removed: usize,
}

/// Remove the artist's media objects from storage, then the artist row.
///
/// The platform cascades the row delete to framework, session and media
/// rows. A storage failure stops before the row is touched.
pub async fn delete_artist(
    backend: &Backend,
    artist_id: EntityId,
) -> Result<DeleteOutcome, WorkflowError> {
    let tables = backend.tables();
    ArtistRepo::find_by_id(tables, artist_id)
        .await
        .map_err(WorkflowError::fetch(Step::ArtistFetch))?
        .ok_or(WorkflowError::NotFound(artist_id))?;

    let media = MediaRepo::list_by_artist(tables, artist_id)
        .await
        .map_err(WorkflowError::fetch(Step::MediaFetch))?;

    let bucket = backend.storage().bucket();
    let paths: Vec<String> = media
        .iter()
        .filter_map(|m| object_path_from_url(&m.url, bucket))
        .collect();
    if !paths.is_empty() {
        backend
            .storage()
            .remove(&paths)
            .await
            .map_err(WorkflowError::delete(Step::MediaStorageRemove))?;
    }

    let deleted = ArtistRepo::delete(tables, artist_id)
        .await
        .map_err(WorkflowError::delete(Step::ArtistDelete))?;
    if !deleted {
        return Err(WorkflowError::NotFound(artist_id));
    }

    tracing::info!(%artist_id, objects_removed = paths.len(), "Artist deleted");
    Ok(DeleteOutcome {
        artist_id,
        objects_removed: paths.len(),
    })
}
