//! Multipart form parsing for the artist create and edit forms.
//!
//! Text fields arrive as plain parts; files as parts with a file name. An
//! empty file part (a file input left blank) is ignored. Unknown fields are
//! ignored.

use artlab_core::naming::base_file_name;
use artlab_core::tags::parse_comma_list;
use artlab_core::types::EntityId;
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::{AppError, AppResult};

/// Content type assumed when a file part does not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file received in a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Base name as sent by the browser, without directories.
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Fields of the create-artist form. Text fields are kept raw; the workflow
/// validates them.
#[derive(Debug, Default)]
pub struct CreateArtistForm {
    pub name: String,
    pub project_name: String,
    pub project_description: String,
    pub campaign_statement: String,
    pub current_stage: String,
    pub avatar: Option<UploadedFile>,
    /// Comma-separated.
    pub values: String,
    /// Comma-separated.
    pub goals: String,
    /// Comma-separated.
    pub brand: String,
    pub session_summary: String,
    /// Comma-separated.
    pub themes: String,
    pub media: Vec<UploadedFile>,
}

/// Fields of the edit-artist form. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct EditArtistForm {
    pub name: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub campaign_statement: Option<String>,
    pub current_stage: Option<String>,
    pub values: Option<String>,
    pub goals: Option<String>,
    pub brand: Option<String>,
    pub session_summary: Option<String>,
    pub themes: Option<String>,
    pub avatar: Option<UploadedFile>,
    /// Ids of existing media to remove, from repeated or comma-separated
    /// `delete_media` fields.
    pub delete_media: Vec<EntityId>,
    pub media: Vec<UploadedFile>,
}

enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: UploadedFile },
}

async fn next_part(multipart: &mut Multipart) -> AppResult<Option<FormPart>> {
    loop {
        let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        else {
            return Ok(None);
        };

        let name = field.name().unwrap_or("").to_string();
        if field.file_name().is_some() {
            match read_file(field).await? {
                Some(file) => return Ok(Some(FormPart::File { name, file })),
                None => continue,
            }
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(Some(FormPart::Text { name, value }));
    }
}

async fn read_file(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    let file_name = base_file_name(field.file_name().unwrap_or("")).to_string();
    let content_type = field
        .content_type()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }
    if file_name.is_empty() {
        return Err(AppError::BadRequest("Uploaded file has no name".into()));
    }
    Ok(Some(UploadedFile {
        file_name,
        content_type,
        data,
    }))
}

/// Read the create-artist form.
pub async fn read_create_form(mut multipart: Multipart) -> AppResult<CreateArtistForm> {
    let mut form = CreateArtistForm::default();

    while let Some(part) = next_part(&mut multipart).await? {
        match part {
            FormPart::Text { name, value } => match name.as_str() {
                "name" => form.name = value,
                "project_name" => form.project_name = value,
                "project_description" => form.project_description = value,
                "campaign_statement" => form.campaign_statement = value,
                "current_stage" => form.current_stage = value,
                "values" => form.values = value,
                "goals" => form.goals = value,
                "brand" => form.brand = value,
                "session_summary" => form.session_summary = value,
                "themes" => form.themes = value,
                _ => {} // ignore unknown fields
            },
            FormPart::File { name, file } => match name.as_str() {
                "avatar" => form.avatar = Some(file),
                "media" => form.media.push(file),
                _ => {}
            },
        }
    }

    Ok(form)
}

/// Read the edit-artist form.
pub async fn read_edit_form(mut multipart: Multipart) -> AppResult<EditArtistForm> {
    let mut form = EditArtistForm::default();

    while let Some(part) = next_part(&mut multipart).await? {
        match part {
            FormPart::Text { name, value } => match name.as_str() {
                "name" => form.name = Some(value),
                "project_name" => form.project_name = Some(value),
                "project_description" => form.project_description = Some(value),
                "campaign_statement" => form.campaign_statement = Some(value),
                "current_stage" => form.current_stage = Some(value),
                "values" => form.values = Some(value),
                "goals" => form.goals = Some(value),
                "brand" => form.brand = Some(value),
                "session_summary" => form.session_summary = Some(value),
                "themes" => form.themes = Some(value),
                "delete_media" => {
                    for raw in parse_comma_list(&value) {
                        let id = raw.parse::<EntityId>().map_err(|_| {
                            AppError::BadRequest(format!("Invalid media id '{raw}'"))
                        })?;
                        if !form.delete_media.contains(&id) {
                            form.delete_media.push(id);
                        }
                    }
                }
                _ => {}
            },
            FormPart::File { name, file } => match name.as_str() {
                "avatar" => form.avatar = Some(file),
                "media" => form.media.push(file),
                _ => {}
            },
        }
    }

    Ok(form)
}
