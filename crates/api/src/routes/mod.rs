pub mod admin;
pub mod health;
pub mod theme;
pub mod wall;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /wall/artists                      list all artists
/// /wall/artists/{id}                 profile bundle
///
/// /admin/artists                     search + paginate, create (multipart)
/// /admin/artists/{id}                edit bundle, edit (multipart), delete
///
/// /user/theme                        get, set
/// /user/theme/toggle                 toggle (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/wall", wall::router())
        .nest("/admin", admin::router())
        .nest("/user", theme::router())
}
