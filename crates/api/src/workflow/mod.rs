//! The artist workflows: create, update, delete and profile loading.
//!
//! Each workflow is a linear sequence of awaited backend calls. There are no
//! retries and no rollback: a failing step stops the sequence and leaves the
//! earlier writes in place. Failures of individual media files are the
//! exception; they are logged, reported in the outcome and skipped.

pub mod create;
pub mod delete;
pub mod profile;
pub mod update;

use artlab_core::error::CoreError;
use artlab_core::media::{MediaType, UploadRejection};
use artlab_core::types::EntityId;
use artlab_core::validation::MissingFields;
use artlab_db::models::media::{CreateMedia, Media};
use artlab_db::repositories::MediaRepo;
use artlab_db::{Backend, BackendError, UploadOptions};
use serde::Serialize;

use crate::forms::UploadedFile;

/// A named step of a workflow, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AvatarUpload,
    ArtistInsert,
    FrameworkInsert,
    SessionInsert,
    ArtistFetch,
    FrameworkFetch,
    SessionFetch,
    MediaFetch,
    ArtistUpdate,
    FrameworkUpsert,
    SessionUpsert,
    MediaStorageRemove,
    MediaDelete,
    ArtistDelete,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Step::AvatarUpload => "Avatar upload",
            Step::ArtistInsert => "Artist insert",
            Step::FrameworkInsert => "MAS Framework insert",
            Step::SessionInsert => "Session insert",
            Step::ArtistFetch => "Artist fetch",
            Step::FrameworkFetch => "MAS Framework fetch",
            Step::SessionFetch => "Session fetch",
            Step::MediaFetch => "Media fetch",
            Step::ArtistUpdate => "Artist update",
            Step::FrameworkUpsert => "MAS Framework update",
            Step::SessionUpsert => "Session update",
            Step::MediaStorageRemove => "Media storage delete",
            Step::MediaDelete => "Media delete",
            Step::ArtistDelete => "Artist delete",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a workflow stopped.
///
/// The backend variants display as `"<step> error: <platform message>"`,
/// e.g. `"Artist insert error: duplicate key value"`.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{step} error: {source}")]
    Upload {
        step: Step,
        #[source]
        source: BackendError,
    },

    #[error("{step} error: {source}")]
    Insert {
        step: Step,
        #[source]
        source: BackendError,
    },

    #[error("{step} error: {source}")]
    Delete {
        step: Step,
        #[source]
        source: BackendError,
    },

    #[error("{step} error: {source}")]
    Fetch {
        step: Step,
        #[source]
        source: BackendError,
    },

    /// The submitted form was rejected before any write.
    #[error("{message}")]
    Validation {
        message: String,
        /// Offending form fields, when known.
        fields: Vec<&'static str>,
    },

    #[error("Artist not found")]
    NotFound(EntityId),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn upload(step: Step) -> impl FnOnce(BackendError) -> Self {
        move |source| WorkflowError::Upload { step, source }
    }

    pub(crate) fn insert(step: Step) -> impl FnOnce(BackendError) -> Self {
        move |source| WorkflowError::Insert { step, source }
    }

    pub(crate) fn delete(step: Step) -> impl FnOnce(BackendError) -> Self {
        move |source| WorkflowError::Delete { step, source }
    }

    pub(crate) fn fetch(step: Step) -> impl FnOnce(BackendError) -> Self {
        move |source| WorkflowError::Fetch { step, source }
    }
}

impl From<MissingFields> for WorkflowError {
    fn from(err: MissingFields) -> Self {
        WorkflowError::Validation {
            message: err.to_string(),
            fields: err.fields,
        }
    }
}

impl From<CoreError> for WorkflowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => WorkflowError::validation(message),
            CoreError::NotFound { id, .. } => WorkflowError::NotFound(id),
            other => WorkflowError::validation(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-file failures
// ---------------------------------------------------------------------------

/// Where a media file dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaFailureStage {
    /// Refused by the size, duration or type rules; never uploaded.
    Rejected,
    Upload,
    Insert,
}

/// A media file that was skipped, with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFailure {
    pub file_name: String,
    pub stage: MediaFailureStage,
    pub error: String,
}

impl From<UploadRejection> for MediaFailure {
    fn from(rejection: UploadRejection) -> Self {
        MediaFailure {
            file_name: rejection.file_name().to_string(),
            stage: MediaFailureStage::Rejected,
            error: rejection.to_string(),
        }
    }
}

/// Upload one media file to `path` and record it in the `media` table.
///
/// Failures are logged and returned as a [`MediaFailure`] so the caller can
/// carry on with the next file.
pub(crate) async fn store_media_file(
    backend: &Backend,
    artist_id: EntityId,
    path: &str,
    file: &UploadedFile,
) -> Result<Media, MediaFailure> {
    let options = UploadOptions::new(&file.content_type);
    if let Err(e) = backend
        .storage()
        .upload(path, file.data.clone(), &options)
        .await
    {
        tracing::warn!(%artist_id, path, file_name = %file.file_name, error = %e, "Media upload failed");
        return Err(MediaFailure {
            file_name: file.file_name.clone(),
            stage: MediaFailureStage::Upload,
            error: format!("Upload error: {e}"),
        });
    }

    let input = CreateMedia {
        artist_id,
        media_type: MediaType::for_content_type(&file.content_type),
        url: backend.storage().public_url(path),
        description: None,
        file_name: file.file_name.clone(),
    };
    MediaRepo::create(backend.tables(), &input)
        .await
        .map_err(|e| {
            tracing::warn!(%artist_id, path, file_name = %file.file_name, error = %e, "Media insert failed");
            MediaFailure {
                file_name: file.file_name.clone(),
                stage: MediaFailureStage::Insert,
                error: format!("Media insert error: {e}"),
            }
        })
}

#[cfg(test)]
mod tests {
    use artlab_core::validation::RequiredFields;

    use super::*;

    #[test]
    fn backend_errors_name_the_failing_step() {
        let err = WorkflowError::insert(Step::FrameworkInsert)(BackendError::Api {
            status: 400,
            code: None,
            message: "null value in column \"values\"".into(),
        });
        assert_eq!(
            err.to_string(),
            "MAS Framework insert error: null value in column \"values\""
        );
    }

    #[test]
    fn missing_fields_keep_the_field_list() {
        let err: WorkflowError = RequiredFields::default()
            .text("name", "")
            .finish()
            .unwrap_err()
            .into();
        match err {
            WorkflowError::Validation { message, fields } => {
                assert_eq!(message, "Please fill in all required fields.");
                assert_eq!(fields, vec!["name"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejections_become_rejected_failures() {
        let failure = MediaFailure::from(UploadRejection::UnsupportedType {
            file_name: "a.exe".into(),
            content_type: "application/x-msdownload".into(),
        });
        assert_eq!(failure.stage, MediaFailureStage::Rejected);
        assert_eq!(failure.error, "File \"a.exe\" is not a supported type.");
    }
}
