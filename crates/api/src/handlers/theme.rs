//! Handlers for the light/dark theme preference, kept in a cookie.

use artlab_core::theme::{
    cookie_value, resolve_theme, theme_set_cookie, Theme, ThemeSource, THEME_COOKIE,
};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

/// Client hint carrying the browser's `prefers-color-scheme`.
const PREFERS_COLOR_SCHEME: &str = "sec-ch-prefers-color-scheme";

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub source: ThemeSource,
}

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub theme: String,
}

fn current_theme(headers: &HeaderMap) -> (Theme, ThemeSource) {
    let saved = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| cookie_value(header, THEME_COOKIE));
    let prefers = headers
        .get(PREFERS_COLOR_SCHEME)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_matches('"'));
    resolve_theme(saved, prefers)
}

fn saved_response(theme: Theme) -> AppResult<Response> {
    let cookie = HeaderValue::from_str(&theme_set_cookie(theme))
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let body = Json(DataResponse {
        data: ThemeResponse {
            theme,
            source: ThemeSource::Saved,
        },
    });
    Ok(([(SET_COOKIE, cookie)], body).into_response())
}

/// GET /api/v1/user/theme
///
/// Saved theme, else the client hint, else light.
pub async fn get_theme(headers: HeaderMap) -> Json<DataResponse<ThemeResponse>> {
    let (theme, source) = current_theme(&headers);
    Json(DataResponse {
        data: ThemeResponse { theme, source },
    })
}

/// PUT /api/v1/user/theme
pub async fn set_theme(Json(input): Json<SetThemeRequest>) -> AppResult<Response> {
    let theme = Theme::from_name(&input.theme)?;
    saved_response(theme)
}

/// POST /api/v1/user/theme/toggle
pub async fn toggle_theme(headers: HeaderMap) -> AppResult<Response> {
    let (theme, _) = current_theme(&headers);
    saved_response(theme.toggled())
}
