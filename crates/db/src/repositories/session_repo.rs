//! Repository for the `sessions` table.

use artlab_core::types::EntityId;

use super::{decode_rows, encode, returned_row};
use crate::backend::{Filter, Order, TableStore};
use crate::error::BackendError;
use crate::models::session::{CreateSession, Session, UpsertSession};
use crate::tables::SESSIONS;

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        tables: &dyn TableStore,
        input: &CreateSession,
    ) -> Result<Session, BackendError> {
        let rows = tables
            .insert(SESSIONS, vec![encode(SESSIONS, input)?])
            .await?;
        returned_row(SESSIONS, rows)
    }

    /// All sessions of an artist, oldest first. The first one is the one the
    /// edit form works on.
    pub async fn list_by_artist(
        tables: &dyn TableStore,
        artist_id: EntityId,
    ) -> Result<Vec<Session>, BackendError> {
        let rows = tables
            .select(
                SESSIONS,
                &[Filter::eq("artist_id", artist_id)],
                Some(&Order::asc("date")),
            )
            .await?;
        decode_rows(SESSIONS, rows)
    }

    pub async fn upsert(
        tables: &dyn TableStore,
        input: &UpsertSession,
    ) -> Result<Session, BackendError> {
        let rows = tables
            .upsert(SESSIONS, vec![encode(SESSIONS, input)?])
            .await?;
        returned_row(SESSIONS, rows)
    }
}
