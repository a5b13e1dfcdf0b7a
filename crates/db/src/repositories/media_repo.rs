//! Repository for the `media` table.

use artlab_core::types::EntityId;

use super::{decode_rows, encode, returned_row};
use crate::backend::{Filter, Order, TableStore};
use crate::error::BackendError;
use crate::models::media::{CreateMedia, Media};
use crate::tables::MEDIA;

/// Provides insert, lookup and bulk delete for media rows.
pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(tables: &dyn TableStore, input: &CreateMedia) -> Result<Media, BackendError> {
        let rows = tables.insert(MEDIA, vec![encode(MEDIA, input)?]).await?;
        returned_row(MEDIA, rows)
    }

    /// Media of an artist in upload order.
    pub async fn list_by_artist(
        tables: &dyn TableStore,
        artist_id: EntityId,
    ) -> Result<Vec<Media>, BackendError> {
        let rows = tables
            .select(
                MEDIA,
                &[Filter::eq("artist_id", artist_id)],
                Some(&Order::asc("created_at")),
            )
            .await?;
        decode_rows(MEDIA, rows)
    }

    /// Rows among `ids` that belong to `artist_id`. Ids of other artists are
    /// silently left out.
    pub async fn find_by_ids_for_artist(
        tables: &dyn TableStore,
        artist_id: EntityId,
        ids: &[EntityId],
    ) -> Result<Vec<Media>, BackendError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = tables
            .select(
                MEDIA,
                &[Filter::any_of("id", ids), Filter::eq("artist_id", artist_id)],
                None,
            )
            .await?;
        decode_rows(MEDIA, rows)
    }

    /// Delete the given rows of one artist, returning how many went.
    pub async fn delete_by_ids(
        tables: &dyn TableStore,
        artist_id: EntityId,
        ids: &[EntityId],
    ) -> Result<usize, BackendError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let rows = tables
            .delete(
                MEDIA,
                &[Filter::any_of("id", ids), Filter::eq("artist_id", artist_id)],
            )
            .await?;
        Ok(rows.len())
    }
}
