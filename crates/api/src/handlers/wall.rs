//! Handlers for the public wall: the artist list and profile pages.

use artlab_core::types::EntityId;
use artlab_db::models::artist::Artist;
use artlab_db::repositories::ArtistRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::profile::{load_profile, ArtistProfile};

/// GET /api/v1/wall/artists
pub async fn list_artists(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Artist>>>> {
    let artists = ArtistRepo::list(state.backend.tables()).await?;
    Ok(Json(DataResponse { data: artists }))
}

/// GET /api/v1/wall/artists/{id}
///
/// The artist with framework, sessions and media, media grouped by kind.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<ArtistProfile>>> {
    let profile = load_profile(&state.backend, id).await?;
    Ok(Json(DataResponse { data: profile }))
}
