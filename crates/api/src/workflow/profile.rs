//! Load an artist with everything attached to it.
//!
//! The artist row is read first; the framework, session and media queries
//! then run concurrently.

use artlab_core::media::{classify, file_extension, MediaKind};
use artlab_core::types::EntityId;
use artlab_db::models::artist::Artist;
use artlab_db::models::framework::MasFramework;
use artlab_db::models::media::Media;
use artlab_db::models::session::Session;
use artlab_db::repositories::{ArtistRepo, FrameworkRepo, MediaRepo, SessionRepo};
use artlab_db::Backend;
use serde::Serialize;

use super::{Step, WorkflowError};

/// The stored rows of one artist.
#[derive(Debug, Clone)]
pub struct ArtistRecords {
    pub artist: Artist,
    pub framework: Option<MasFramework>,
    /// Oldest first.
    pub sessions: Vec<Session>,
    pub media: Vec<Media>,
}

/// Read an artist and its framework, sessions and media.
pub async fn load_artist_records(
    backend: &Backend,
    artist_id: EntityId,
) -> Result<ArtistRecords, WorkflowError> {
    let tables = backend.tables();
    let artist = ArtistRepo::find_by_id(tables, artist_id)
        .await
        .map_err(WorkflowError::fetch(Step::ArtistFetch))?
        .ok_or(WorkflowError::NotFound(artist_id))?;

    let (framework, sessions, media) = tokio::try_join!(
        async {
            FrameworkRepo::find_by_artist(tables, artist_id)
                .await
                .map_err(WorkflowError::fetch(Step::FrameworkFetch))
        },
        async {
            SessionRepo::list_by_artist(tables, artist_id)
                .await
                .map_err(WorkflowError::fetch(Step::SessionFetch))
        },
        async {
            MediaRepo::list_by_artist(tables, artist_id)
                .await
                .map_err(WorkflowError::fetch(Step::MediaFetch))
        },
    )?;

    Ok(ArtistRecords {
        artist,
        framework,
        sessions,
        media,
    })
}

/// A media row with how the profile should present it.
#[derive(Debug, Clone, Serialize)]
pub struct MediaView {
    #[serde(flatten)]
    pub media: Media,
    pub kind: MediaKind,
    /// Upper-case extension, `FILE` when the URL has none.
    pub extension: String,
}

impl From<Media> for MediaView {
    fn from(media: Media) -> Self {
        let kind = classify(&media.url, media.media_type);
        let extension = file_extension(&media.url);
        Self {
            media,
            kind,
            extension,
        }
    }
}

/// Media split by display kind, each in upload order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaGroups {
    pub image: Vec<MediaView>,
    pub video: Vec<MediaView>,
    pub document: Vec<MediaView>,
    pub other: Vec<MediaView>,
}

impl MediaGroups {
    pub fn group(views: &[MediaView]) -> Self {
        let mut groups = Self::default();
        for view in views {
            let bucket = match view.kind {
                MediaKind::Image => &mut groups.image,
                MediaKind::Video => &mut groups.video,
                MediaKind::Document => &mut groups.document,
                MediaKind::Other => &mut groups.other,
            };
            bucket.push(view.clone());
        }
        groups
    }

    pub fn len(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.image.len(),
            MediaKind::Video => self.video.len(),
            MediaKind::Document => self.document.len(),
            MediaKind::Other => self.other.len(),
        }
    }
}

/// The public profile of one artist.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistProfile {
    pub artist: Artist,
    pub framework: Option<MasFramework>,
    pub sessions: Vec<Session>,
    pub media: Vec<MediaView>,
    pub media_by_kind: MediaGroups,
}

impl From<ArtistRecords> for ArtistProfile {
    fn from(records: ArtistRecords) -> Self {
        let media: Vec<MediaView> = records.media.into_iter().map(MediaView::from).collect();
        let media_by_kind = MediaGroups::group(&media);
        Self {
            artist: records.artist,
            framework: records.framework,
            sessions: records.sessions,
            media,
            media_by_kind,
        }
    }
}

/// Load the profile view of an artist.
pub async fn load_profile(
    backend: &Backend,
    artist_id: EntityId,
) -> Result<ArtistProfile, WorkflowError> {
    Ok(load_artist_records(backend, artist_id).await?.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use artlab_core::media::MediaType;
    use artlab_db::memory::MemoryBackend;
    use artlab_db::tables;
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    async fn seed(memory: &MemoryBackend) -> EntityId {
        use artlab_db::TableStore;

        let rows = memory
            .insert(
                tables::ARTISTS,
                vec![json!({
                    "name": "Nova",
                    "avatar_url": "",
                    "project_name": "Night Songs",
                    "project_description": "EP",
                    "campaign_statement": "Loud",
                    "current_stage": "Launch"
                })],
            )
            .await
            .unwrap();
        let id: EntityId = rows[0]["id"].as_str().unwrap().parse().unwrap();
        let url = |name: &str| {
            format!("http://memory.local/storage/v1/object/public/lab-upload/media/{id}/{name}")
        };
        memory
            .insert(
                tables::MEDIA,
                vec![
                    json!({"artist_id": id, "type": "photo", "url": url("cover.PNG"), "file_name": "cover.PNG"}),
                    json!({"artist_id": id, "type": "video", "url": url("teaser"), "file_name": "teaser"}),
                    json!({"artist_id": id, "type": "press", "url": url("press.pdf"), "file_name": "press.pdf"}),
                    json!({"artist_id": id, "type": "moodboard", "url": url("board.webp")}),
                ],
            )
            .await
            .unwrap();
        memory
            .insert(
                tables::SESSIONS,
                vec![
                    json!({"artist_id": id, "summary": "second", "date": "2024-06-01T00:00:00Z", "themes": []}),
                    json!({"artist_id": id, "summary": "first", "date": "2024-05-01T00:00:00Z", "themes": ["x"]}),
                ],
            )
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn profile_groups_media_by_kind() {
        let memory = Arc::new(MemoryBackend::default());
        let backend = Backend::from_shared(memory.clone());
        let id = seed(&memory).await;

        let profile = load_profile(&backend, id).await.unwrap();

        assert!(profile.framework.is_none());
        assert_eq!(profile.sessions[0].summary, "first");
        assert_eq!(profile.media.len(), 4);
        assert_eq!(profile.media_by_kind.len(MediaKind::Image), 2);
        assert_eq!(profile.media_by_kind.len(MediaKind::Video), 1);
        assert_eq!(profile.media_by_kind.len(MediaKind::Document), 1);
        assert_eq!(profile.media_by_kind.len(MediaKind::Other), 0);

        let video = &profile.media_by_kind.video[0];
        assert_eq!(video.media.media_type, MediaType::Video);
        assert_eq!(video.extension, "FILE");
        assert_eq!(profile.media[0].extension, "PNG");
        assert_eq!(profile.media_by_kind.document[0].media.media_type, MediaType::Other);
    }

    #[tokio::test]
    async fn missing_artist_is_not_found() {
        let backend = Backend::from_shared(Arc::new(MemoryBackend::default()));
        let id = uuid::Uuid::new_v4();
        assert_matches!(
            load_profile(&backend, id).await,
            Err(WorkflowError::NotFound(missing)) if missing == id
        );
    }

    #[test]
    fn media_view_serializes_flat() {
        let view = MediaView::from(Media {
            id: uuid::Uuid::nil(),
            artist_id: uuid::Uuid::nil(),
            media_type: MediaType::Photo,
            url: "http://x/a.docx".into(),
            description: None,
            file_name: Some("a.docx".into()),
            created_at: chrono::Utc::now(),
        });
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["type"], "photo");
        assert_eq!(value["kind"], "image");
        assert_eq!(value["extension"], "DOCX");
    }
}
