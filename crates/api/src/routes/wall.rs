use axum::routing::get;
use axum::Router;

use crate::handlers::wall;
use crate::state::AppState;

/// Routes mounted at `/wall`.
///
/// ```text
/// GET    /artists          -> list_artists
/// GET    /artists/{id}     -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artists", get(wall::list_artists))
        .route("/artists/{id}", get(wall::get_profile))
}
