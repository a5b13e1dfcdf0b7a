//! Light/dark colour scheme preference.
//!
//! The preference is the only client-local state of the lab. It travels in
//! a `theme` cookie; without one, the browser's `prefers-color-scheme`
//! client hint decides.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Cookie carrying the saved preference.
pub const THEME_COOKIE: &str = "theme";

/// One year, matching a long-lived local setting.
pub const THEME_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(CoreError::Validation(format!(
                "Invalid theme '{other}'. Must be one of: light, dark"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Where a resolved theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSource {
    Saved,
    SystemPreference,
    Default,
}

/// Resolve the effective theme from the saved cookie value and the
/// `prefers-color-scheme` hint. An unparseable saved value is ignored.
pub fn resolve_theme(saved: Option<&str>, prefers: Option<&str>) -> (Theme, ThemeSource) {
    if let Some(theme) = saved.and_then(|s| Theme::from_name(s).ok()) {
        return (theme, ThemeSource::Saved);
    }
    match prefers.map(str::trim) {
        Some("dark") => (Theme::Dark, ThemeSource::SystemPreference),
        Some("light") => (Theme::Light, ThemeSource::SystemPreference),
        _ => (Theme::default(), ThemeSource::Default),
    }
}

/// Find a cookie value in a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value.trim_matches('"'))
    })
}

/// `Set-Cookie` header value persisting `theme`.
pub fn theme_set_cookie(theme: Theme) -> String {
    format!(
        "{THEME_COOKIE}={}; Path=/; Max-Age={THEME_COOKIE_MAX_AGE_SECS}; SameSite=Lax",
        theme.name()
    )
}
