//! Handlers for the admin dashboard: search, create, edit and delete.

use artlab_core::listing::{matches_search, paginate, Page, ARTISTS_PER_PAGE};
use artlab_core::types::EntityId;
use artlab_db::models::artist::Artist;
use artlab_db::models::framework::MasFramework;
use artlab_db::models::media::Media;
use artlab_db::models::session::Session;
use artlab_db::repositories::ArtistRepo;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::forms::{read_create_form, read_edit_form};
use crate::query::ListArtistsParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::create::{create_artist as run_create, NewArtist, CREATED_MESSAGE};
use crate::workflow::delete::delete_artist as run_delete;
use crate::workflow::profile::load_artist_records;
use crate::workflow::update::{
    update_artist as run_update, ArtistBundle, ArtistEdit, EditView, UPDATED_MESSAGE,
};
use crate::workflow::MediaFailure;

/// Response body of a successful create.
#[derive(Debug, Serialize)]
pub struct CreateArtistResponse {
    pub message: &'static str,
    pub artist: Artist,
    pub framework: MasFramework,
    pub session: Session,
    pub media: Vec<Media>,
    pub media_created: usize,
    pub media_failures: Vec<MediaFailure>,
}

/// Response body of a successful edit.
#[derive(Debug, Serialize)]
pub struct UpdateArtistResponse {
    pub message: &'static str,
    pub artist: Artist,
    pub framework: MasFramework,
    pub session: Session,
    pub media_added: Vec<Media>,
    pub media_deleted: usize,
    pub media_failures: Vec<MediaFailure>,
}

/// GET /api/v1/admin/artists?search=&page=
///
/// Case-insensitive search over name and project name, 8 per page.
pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<ListArtistsParams>,
) -> AppResult<Json<DataResponse<Page<Artist>>>> {
    let term = params.search.unwrap_or_default();
    let artists: Vec<Artist> = ArtistRepo::list(state.backend.tables())
        .await?
        .into_iter()
        .filter(|a| matches_search(&a.name, &a.project_name, &term))
        .collect();
    let page = paginate(artists, params.page.unwrap_or(1), ARTISTS_PER_PAGE);
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/admin/artists
///
/// Multipart form: `name`, `project_name`, `project_description`,
/// `campaign_statement`, `current_stage` (required); `avatar` file;
/// comma-separated `values`, `goals`, `brand`, `themes`; `session_summary`;
/// any number of `media` files.
pub async fn create_artist(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CreateArtistResponse>>)> {
    let form = read_create_form(multipart).await?;
    let input = NewArtist::from_form(form)?;
    let outcome = run_create(&state.backend, input).await?;

    let response = CreateArtistResponse {
        message: CREATED_MESSAGE,
        media_created: outcome.media.len(),
        artist: outcome.artist,
        framework: outcome.framework,
        session: outcome.session,
        media: outcome.media,
        media_failures: outcome.media_failures,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/artists/{id}
///
/// The current artist bundle with comma-joined values to pre-fill the edit
/// form.
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<EditView>>> {
    let bundle = ArtistBundle::from(load_artist_records(&state.backend, id).await?);
    Ok(Json(DataResponse {
        data: EditView::from(bundle),
    }))
}

/// PUT /api/v1/admin/artists/{id}
///
/// Multipart form with any subset of the create fields plus `delete_media`
/// ids. Absent fields keep their current value.
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<UpdateArtistResponse>>> {
    let form = read_edit_form(multipart).await?;
    let bundle = ArtistBundle::from(load_artist_records(&state.backend, id).await?);
    let edit = ArtistEdit::resolve(&bundle, form)?;
    let outcome = run_update(&state.backend, state.probe.as_ref(), bundle, edit).await?;

    Ok(Json(DataResponse {
        data: UpdateArtistResponse {
            message: UPDATED_MESSAGE,
            artist: outcome.artist,
            framework: outcome.framework,
            session: outcome.session,
            media_added: outcome.media_added,
            media_deleted: outcome.media_deleted,
            media_failures: outcome.media_failures,
        },
    }))
}

/// DELETE /api/v1/admin/artists/{id}
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    run_delete(&state.backend, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
