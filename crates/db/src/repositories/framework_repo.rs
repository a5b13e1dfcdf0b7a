//! Repository for the `mas_frameworks` table.

use artlab_core::types::EntityId;

use super::{encode, first_row, returned_row};
use crate::backend::{Filter, TableStore};
use crate::error::BackendError;
use crate::models::framework::{CreateFramework, MasFramework, UpsertFramework};
use crate::tables::FRAMEWORKS;

pub struct FrameworkRepo;

impl FrameworkRepo {
    pub async fn create(
        tables: &dyn TableStore,
        input: &CreateFramework,
    ) -> Result<MasFramework, BackendError> {
        let rows = tables
            .insert(FRAMEWORKS, vec![encode(FRAMEWORKS, input)?])
            .await?;
        returned_row(FRAMEWORKS, rows)
    }

    /// The artist's framework. Only the first row counts if there are several.
    pub async fn find_by_artist(
        tables: &dyn TableStore,
        artist_id: EntityId,
    ) -> Result<Option<MasFramework>, BackendError> {
        let rows = tables
            .select(FRAMEWORKS, &[Filter::eq("artist_id", artist_id)], None)
            .await?;
        first_row(FRAMEWORKS, rows)
    }

    /// Insert or replace by primary key.
    pub async fn upsert(
        tables: &dyn TableStore,
        input: &UpsertFramework,
    ) -> Result<MasFramework, BackendError> {
        let rows = tables
            .upsert(FRAMEWORKS, vec![encode(FRAMEWORKS, input)?])
            .await?;
        returned_row(FRAMEWORKS, rows)
    }
}
