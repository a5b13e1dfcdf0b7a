use axum::routing::{get, post};
use axum::Router;

use crate::handlers::theme;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /theme            -> get_theme
/// PUT    /theme            -> set_theme
/// POST   /theme/toggle     -> toggle_theme
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/theme", get(theme::get_theme).put(theme::set_theme))
        .route("/theme/toggle", post(theme::toggle_theme))
}
