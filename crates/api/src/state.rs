use std::sync::Arc;

use artlab_db::Backend;

use crate::config::ServerConfig;
use crate::probe::MediaProbe;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Tables and storage of the data platform.
    pub backend: Backend,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Reads video durations for upload checks.
    pub probe: Arc<dyn MediaProbe>,
}
