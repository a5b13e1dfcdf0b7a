use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /artists          -> list_artists
/// POST   /artists          -> create_artist
/// GET    /artists/{id}     -> get_artist
/// PUT    /artists/{id}     -> update_artist
/// DELETE /artists/{id}     -> delete_artist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/artists",
            get(admin::list_artists).post(admin::create_artist),
        )
        .route(
            "/artists/{id}",
            get(admin::get_artist)
                .put(admin::update_artist)
                .delete(admin::delete_artist),
        )
}
