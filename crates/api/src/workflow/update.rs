//! Edit an artist: avatar replacement, media removal and upload, then the
//! artist, framework and session writes.

use artlab_core::media::{
    is_image_content_type, is_video_content_type, validate_upload, UploadCheck, MAX_UPLOAD_BYTES,
};
use artlab_core::naming::{object_path_from_url, timestamped_avatar_path, timestamped_media_path};
use artlab_core::stage::Stage;
use artlab_core::tags::{join_comma_list, parse_comma_list};
use artlab_core::types::EntityId;
use artlab_core::validation::RequiredFields;
use artlab_db::models::artist::{Artist, UpdateArtist};
use artlab_db::models::framework::{MasFramework, UpsertFramework};
use artlab_db::models::media::Media;
use artlab_db::models::session::{Session, UpsertSession};
use artlab_db::repositories::{ArtistRepo, FrameworkRepo, MediaRepo, SessionRepo};
use artlab_db::{Backend, UploadOptions};
use chrono::Utc;
use serde::Serialize;

use super::profile::{ArtistRecords, MediaView};
use super::{store_media_file, MediaFailure, Step, WorkflowError};
use crate::forms::{EditArtistForm, UploadedFile};
use crate::probe::MediaProbe;

pub const UPDATED_MESSAGE: &str = "Artist profile updated successfully!";

/// Cache lifetime for replaced avatars.
const AVATAR_CACHE_SECS: u32 = 3600;

/// The current state of an artist as the edit form sees it: the first
/// session is the one being edited.
#[derive(Debug, Clone)]
pub struct ArtistBundle {
    pub artist: Artist,
    pub framework: Option<MasFramework>,
    pub session: Option<Session>,
    pub media: Vec<Media>,
}

impl From<ArtistRecords> for ArtistBundle {
    fn from(records: ArtistRecords) -> Self {
        Self {
            artist: records.artist,
            framework: records.framework,
            session: records.sessions.into_iter().next(),
            media: records.media,
        }
    }
}

/// Comma-joined field values to pre-fill the edit form with.
#[derive(Debug, Clone, Serialize)]
pub struct EditFormDefaults {
    pub values: String,
    pub goals: String,
    pub brand: String,
    pub session_summary: String,
    pub themes: String,
}

/// What the edit form is opened with.
#[derive(Debug, Clone, Serialize)]
pub struct EditView {
    pub artist: Artist,
    pub framework: Option<MasFramework>,
    pub session: Option<Session>,
    pub media: Vec<MediaView>,
    pub form: EditFormDefaults,
}

impl From<ArtistBundle> for EditView {
    fn from(bundle: ArtistBundle) -> Self {
        let join = |list: Option<&Vec<String>>| list.map(|l| join_comma_list(l)).unwrap_or_default();
        let form = EditFormDefaults {
            values: join(bundle.framework.as_ref().map(|f| &f.values)),
            goals: join(bundle.framework.as_ref().map(|f| &f.goals)),
            brand: join(bundle.framework.as_ref().map(|f| &f.brand)),
            session_summary: bundle
                .session
                .as_ref()
                .map(|s| s.summary.clone())
                .unwrap_or_default(),
            themes: join(bundle.session.as_ref().map(|s| &s.themes)),
        };
        Self {
            artist: bundle.artist,
            framework: bundle.framework,
            session: bundle.session,
            media: bundle.media.into_iter().map(MediaView::from).collect(),
            form,
        }
    }
}

/// A validated edit: the bundle's current values overlaid with the form.
#[derive(Debug)]
pub struct ArtistEdit {
    pub name: String,
    pub project_name: String,
    pub project_description: String,
    pub campaign_statement: String,
    pub stage: Stage,
    pub values: Vec<String>,
    pub goals: Vec<String>,
    pub brand: Vec<String>,
    pub session_summary: String,
    pub themes: Vec<String>,
    pub avatar: Option<UploadedFile>,
    pub delete_media: Vec<EntityId>,
    pub media: Vec<UploadedFile>,
}

impl ArtistEdit {
    /// Merge the form into the current bundle and check the result.
    ///
    /// Every artist field, all three framework lists, and the session summary
    /// and themes must end up non-empty. A new avatar must be an image.
    pub fn resolve(bundle: &ArtistBundle, form: EditArtistForm) -> Result<Self, WorkflowError> {
        let artist = &bundle.artist;
        let pick = |submitted: Option<String>, current: &str| {
            submitted.unwrap_or_else(|| current.to_string())
        };
        let pick_list = |submitted: Option<String>, current: Option<&Vec<String>>| match submitted {
            Some(raw) => parse_comma_list(&raw),
            None => current.cloned().unwrap_or_default(),
        };
        let framework = bundle.framework.as_ref();
        let session = bundle.session.as_ref();

        let name = pick(form.name, &artist.name);
        let project_name = pick(form.project_name, &artist.project_name);
        let project_description = pick(form.project_description, &artist.project_description);
        let campaign_statement = pick(form.campaign_statement, &artist.campaign_statement);
        let stage = pick(form.current_stage, artist.current_stage.name());
        let values = pick_list(form.values, framework.map(|f| &f.values));
        let goals = pick_list(form.goals, framework.map(|f| &f.goals));
        let brand = pick_list(form.brand, framework.map(|f| &f.brand));
        let session_summary = pick(
            form.session_summary,
            session.map(|s| s.summary.as_str()).unwrap_or(""),
        );
        let themes = pick_list(form.themes, session.map(|s| &s.themes));

        RequiredFields::default()
            .text("name", &name)
            .text("project_name", &project_name)
            .text("project_description", &project_description)
            .text("campaign_statement", &campaign_statement)
            .text("current_stage", &stage)
            .list("values", &values)
            .list("goals", &goals)
            .list("brand", &brand)
            .text("session_summary", &session_summary)
            .list("themes", &themes)
            .finish()?;
        let stage = Stage::from_name(&stage)?;

        if let Some(avatar) = &form.avatar {
            if !is_image_content_type(&avatar.content_type) {
                return Err(WorkflowError::Validation {
                    message: format!("Avatar \"{}\" must be an image.", avatar.file_name),
                    fields: vec!["avatar"],
                });
            }
        }

        Ok(Self {
            name: name.trim().to_string(),
            project_name: project_name.trim().to_string(),
            project_description,
            campaign_statement,
            stage,
            values,
            goals,
            brand,
            session_summary,
            themes,
            avatar: form.avatar,
            delete_media: form.delete_media,
            media: form.media,
        })
    }
}

/// Everything the update workflow changed.
#[derive(Debug, Serialize)]
pub struct UpdateOutcome {
    pub artist: Artist,
    pub framework: MasFramework,
    pub session: Session,
    pub media_added: Vec<Media>,
    pub media_deleted: usize,
    pub media_failures: Vec<MediaFailure>,
}

/// Split new files into those passing the size, duration and type rules and
/// the rejections. Only videos within the size limit are probed.
pub async fn screen_uploads(
    probe: &dyn MediaProbe,
    files: Vec<UploadedFile>,
) -> (Vec<UploadedFile>, Vec<MediaFailure>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for file in files {
        // Oversized files are rejected on size alone; never probe them.
        let within_size = file.size_bytes() <= MAX_UPLOAD_BYTES;
        let duration_secs = if within_size && is_video_content_type(&file.content_type) {
            probe.video_duration_secs(&file.data).await
        } else {
            None
        };
        let check = UploadCheck {
            file_name: &file.file_name,
            content_type: &file.content_type,
            size_bytes: file.size_bytes(),
            duration_secs,
        };
        match validate_upload(&check) {
            Ok(()) => accepted.push(file),
            Err(rejection) => {
                tracing::warn!(file_name = %file.file_name, reason = rejection.reason(), "Rejected upload");
                rejected.push(rejection.into());
            }
        }
    }
    (accepted, rejected)
}

/// Run the edit sequence.
///
/// Order: screen new files, replace the avatar, remove the media marked for
/// deletion (storage objects first, then rows), upload new media, then write
/// the artist, framework and session. A failing step stops the sequence and
/// leaves earlier writes in place; rejected or failing media files are
/// skipped and reported.
pub async fn update_artist(
    backend: &Backend,
    probe: &dyn MediaProbe,
    bundle: ArtistBundle,
    edit: ArtistEdit,
) -> Result<UpdateOutcome, WorkflowError> {
    let artist_id = bundle.artist.id;
    let (accepted, mut media_failures) = screen_uploads(probe, edit.media).await;

    // 1. Avatar
    let avatar_url = match &edit.avatar {
        Some(avatar) => {
            let path =
                timestamped_avatar_path(artist_id, Utc::now().timestamp_millis(), &avatar.file_name);
            let options = UploadOptions::new(&avatar.content_type)
                .cache_control(AVATAR_CACHE_SECS)
                .upsert(true);
            backend
                .storage()
                .upload(&path, avatar.data.clone(), &options)
                .await
                .map_err(WorkflowError::upload(Step::AvatarUpload))?;
            Some(backend.storage().public_url(&path))
        }
        None => None,
    };

    // 2. Media removal
    let media_deleted = remove_media(backend, artist_id, &edit.delete_media).await?;

    // 3. New media
    let mut media_added = Vec::new();
    for file in &accepted {
        let path =
            timestamped_media_path(artist_id, Utc::now().timestamp_millis(), &file.file_name);
        match store_media_file(backend, artist_id, &path, file).await {
            Ok(row) => media_added.push(row),
            Err(failure) => media_failures.push(failure),
        }
    }

    // 4. Rows
    let tables = backend.tables();
    let artist = ArtistRepo::update(
        tables,
        artist_id,
        &UpdateArtist {
            name: Some(edit.name),
            avatar_url,
            project_name: Some(edit.project_name),
            project_description: Some(edit.project_description),
            campaign_statement: Some(edit.campaign_statement),
            current_stage: Some(edit.stage),
            updated_at: None,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::ArtistUpdate))?
    .ok_or(WorkflowError::NotFound(artist_id))?;

    let framework = FrameworkRepo::upsert(
        tables,
        &UpsertFramework {
            id: bundle.framework.as_ref().map(|f| f.id),
            artist_id,
            values: edit.values,
            goals: edit.goals,
            brand: edit.brand,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::FrameworkUpsert))?;

    let session = SessionRepo::upsert(
        tables,
        &UpsertSession {
            id: bundle.session.as_ref().map(|s| s.id),
            artist_id,
            summary: edit.session_summary,
            date: bundle.session.as_ref().map_or_else(Utc::now, |s| s.date),
            themes: edit.themes,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::SessionUpsert))?;

    tracing::info!(
        %artist_id,
        media_added = media_added.len(),
        media_deleted,
        media_failed = media_failures.len(),
        "Artist updated",
    );

    Ok(UpdateOutcome {
        artist,
        framework,
        session,
        media_added,
        media_deleted,
        media_failures,
    })
}

/// Remove the artist's media among `ids`: storage objects first, then rows.
/// Ids belonging to other artists or to nothing are ignored.
async fn remove_media(
    backend: &Backend,
    artist_id: EntityId,
    ids: &[EntityId],
) -> Result<usize, WorkflowError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let rows = MediaRepo::find_by_ids_for_artist(backend.tables(), artist_id, ids)
        .await
        .map_err(WorkflowError::fetch(Step::MediaFetch))?;
    if rows.is_empty() {
        return Ok(0);
    }

    let bucket = backend.storage().bucket();
    let paths: Vec<String> = rows
        .iter()
        .filter_map(|m| {
            let path = object_path_from_url(&m.url, bucket);
            if path.is_none() {
                tracing::warn!(media_id = %m.id, url = %m.url, "Media URL names no storage object");
            }
            path
        })
        .collect();
    if !paths.is_empty() {
        backend
            .storage()
            .remove(&paths)
            .await
            .map_err(WorkflowError::delete(Step::MediaStorageRemove))?;
    }

    let found: Vec<EntityId> = rows.iter().map(|m| m.id).collect();
    MediaRepo::delete_by_ids(backend.tables(), artist_id, &found)
        .await
        .map_err(WorkflowError::delete(Step::MediaDelete))
}
