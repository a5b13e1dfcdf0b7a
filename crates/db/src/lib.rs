//! Client for the managed data platform behind the artists lab.
//!
//! The platform exposes four tables (`artists`, `mas_frameworks`,
//! `sessions`, `media`) and one storage bucket. [`Backend`] bundles a
//! [`TableStore`] and an [`ObjectStore`]; [`supabase`] talks to the hosted
//! platform over REST and [`memory`] keeps everything in process.

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod supabase;

pub use backend::{Backend, Filter, ObjectStore, Order, TableStore, UploadOptions};
pub use error::BackendError;

/// Table names.
pub mod tables {
    pub const ARTISTS: &str = "artists";
    pub const FRAMEWORKS: &str = "mas_frameworks";
    pub const SESSIONS: &str = "sessions";
    pub const MEDIA: &str = "media";

    /// Tables holding rows that reference `artists.id` through `artist_id`.
    pub const ARTIST_CHILDREN: &[&str] = &[FRAMEWORKS, SESSIONS, MEDIA];
}

/// Verify the platform answers a cheap query.
pub async fn health_check(backend: &Backend) -> Result<(), BackendError> {
    backend
        .tables()
        .select(
            tables::ARTISTS,
            &[Filter::eq("id", uuid::Uuid::nil())],
            None,
        )
        .await?;
    Ok(())
}
