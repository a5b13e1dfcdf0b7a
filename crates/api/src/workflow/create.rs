//! Create an artist with framework, first session, optional avatar and media.

use artlab_core::naming::{avatar_path, media_path};
use artlab_core::stage::Stage;
use artlab_core::tags::split_comma_list;
use artlab_core::validation::RequiredFields;
use artlab_db::models::artist::{Artist, CreateArtist};
use artlab_db::models::framework::{CreateFramework, MasFramework};
use artlab_db::models::media::Media;
use artlab_db::models::session::{CreateSession, Session};
use artlab_db::repositories::{ArtistRepo, FrameworkRepo, SessionRepo};
use artlab_db::{Backend, UploadOptions};
use chrono::Utc;
use serde::Serialize;

use super::{store_media_file, MediaFailure, Step, WorkflowError};
use crate::forms::{CreateArtistForm, UploadedFile};

pub const CREATED_MESSAGE: &str = "Artist profile created successfully!";

/// A validated create-artist submission.
#[derive(Debug)]
pub struct NewArtist {
    pub name: String,
    pub project_name: String,
    pub project_description: String,
    pub campaign_statement: String,
    pub stage: Stage,
    pub avatar: Option<UploadedFile>,
    pub values: Vec<String>,
    pub goals: Vec<String>,
    pub brand: Vec<String>,
    pub session_summary: String,
    pub themes: Vec<String>,
    pub media: Vec<UploadedFile>,
}

impl NewArtist {
    /// Check the required fields and parse the stage and tag lists.
    pub fn from_form(form: CreateArtistForm) -> Result<Self, WorkflowError> {
        RequiredFields::default()
            .text("name", &form.name)
            .text("project_name", &form.project_name)
            .text("project_description", &form.project_description)
            .text("campaign_statement", &form.campaign_statement)
            .text("current_stage", &form.current_stage)
            .finish()?;
        let stage = Stage::from_name(&form.current_stage)?;

        Ok(Self {
            name: form.name.trim().to_string(),
            project_name: form.project_name.trim().to_string(),
            project_description: form.project_description,
            campaign_statement: form.campaign_statement,
            stage,
            avatar: form.avatar,
            values: split_comma_list(&form.values),
            goals: split_comma_list(&form.goals),
            brand: split_comma_list(&form.brand),
            session_summary: form.session_summary,
            themes: split_comma_list(&form.themes),
            media: form.media,
        })
    }
}

/// Everything the create workflow wrote.
#[derive(Debug, Serialize)]
pub struct CreateOutcome {
    pub artist: Artist,
    pub framework: MasFramework,
    pub session: Session,
    pub media: Vec<Media>,
    pub media_failures: Vec<MediaFailure>,
}

/// Run the create sequence: avatar, artist, framework, session, media.
///
/// Any failure before the media step stops the sequence; rows already
/// written stay. Media files fail one at a time.
pub async fn create_artist(
    backend: &Backend,
    input: NewArtist,
) -> Result<CreateOutcome, WorkflowError> {
    let avatar_url = match &input.avatar {
        Some(avatar) => {
            let path = avatar_path(uuid::Uuid::new_v4(), &avatar.file_name);
            backend
                .storage()
                .upload(
                    &path,
                    avatar.data.clone(),
                    &UploadOptions::new(&avatar.content_type),
                )
                .await
                .map_err(WorkflowError::upload(Step::AvatarUpload))?;
            tracing::debug!(path = %path, "Uploaded avatar");
            backend.storage().public_url(&path)
        }
        None => String::new(),
    };

    let artist = ArtistRepo::create(
        backend.tables(),
        &CreateArtist {
            name: input.name,
            avatar_url,
            project_name: input.project_name,
            project_description: input.project_description,
            campaign_statement: input.campaign_statement,
            current_stage: input.stage,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::ArtistInsert))?;

    let framework = FrameworkRepo::create(
        backend.tables(),
        &CreateFramework {
            artist_id: artist.id,
            values: input.values,
            goals: input.goals,
            brand: input.brand,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::FrameworkInsert))?;

    let session = SessionRepo::create(
        backend.tables(),
        &CreateSession {
            artist_id: artist.id,
            summary: input.session_summary,
            date: Utc::now(),
            themes: input.themes,
        },
    )
    .await
    .map_err(WorkflowError::insert(Step::SessionInsert))?;

    let mut media = Vec::new();
    let mut media_failures = Vec::new();
    for file in &input.media {
        let path = media_path(artist.id, &file.file_name);
        match store_media_file(backend, artist.id, &path, file).await {
            Ok(row) => media.push(row),
            Err(failure) => media_failures.push(failure),
        }
    }

    tracing::info!(
        artist_id = %artist.id,
        media = media.len(),
        media_failed = media_failures.len(),
        "Artist created",
    );

    Ok(CreateOutcome {
        artist,
        framework,
        session,
        media,
        media_failures,
    })
}
