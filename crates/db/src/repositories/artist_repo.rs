//! Repository for the `artists` table.

use artlab_core::types::EntityId;
use chrono::Utc;

use super::{decode_rows, encode, first_row, returned_row};
use crate::backend::{Filter, Order, TableStore};
use crate::error::BackendError;
use crate::models::artist::{Artist, CreateArtist, UpdateArtist};
use crate::tables::ARTISTS;

/// Provides CRUD operations for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist, returning the stored row.
    pub async fn create(
        tables: &dyn TableStore,
        input: &CreateArtist,
    ) -> Result<Artist, BackendError> {
        let rows = tables.insert(ARTISTS, vec![encode(ARTISTS, input)?]).await?;
        returned_row(ARTISTS, rows)
    }

    /// Find an artist by id.
    pub async fn find_by_id(
        tables: &dyn TableStore,
        id: EntityId,
    ) -> Result<Option<Artist>, BackendError> {
        let rows = tables
            .select(ARTISTS, &[Filter::eq("id", id)], None)
            .await?;
        first_row(ARTISTS, rows)
    }

    /// List every artist, newest first.
    pub async fn list(tables: &dyn TableStore) -> Result<Vec<Artist>, BackendError> {
        let rows = tables
            .select(ARTISTS, &[], Some(&Order::desc("created_at")))
            .await?;
        decode_rows(ARTISTS, rows)
    }

    /// Update an artist and stamp `updated_at`. Only non-`None` fields in
    /// `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tables: &dyn TableStore,
        id: EntityId,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, BackendError> {
        let patch = UpdateArtist {
            updated_at: Some(Utc::now()),
            ..input.clone()
        };
        let rows = tables
            .update(ARTISTS, &[Filter::eq("id", id)], encode(ARTISTS, &patch)?)
            .await?;
        first_row(ARTISTS, rows)
    }

    /// Delete an artist. Framework, session and media rows go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(tables: &dyn TableStore, id: EntityId) -> Result<bool, BackendError> {
        let rows = tables.delete(ARTISTS, &[Filter::eq("id", id)]).await?;
        Ok(!rows.is_empty())
    }
}
