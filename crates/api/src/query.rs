//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the admin artist list (`?search=&page=`).
///
/// `page` is 1-based; out-of-range values are clamped when paginating.
#[derive(Debug, Default, Deserialize)]
pub struct ListArtistsParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}
