use std::{fs, path::Path};

use serde::Deserialize;
use tracing::warn;

use crate::staged::{clamp_max_images, MAX_IMAGES};

pub const SETTINGS_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub max_images: usize,
    pub accepted_mime_types: Vec<String>,
    pub preview_scheme: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            accepted_mime_types: vec![
                "image/jpeg".into(),
                "image/jpg".into(),
                "image/png".into(),
            ],
            preview_scheme: "preview".into(),
        }
    }
}

impl EditorSettings {
    /// Files with no detectable type are let through; the backend has the final say.
    pub fn accepts(&self, mime_type: Option<&str>) -> bool {
        let Some(mime_type) = mime_type else {
            return true;
        };
        self.accepted_mime_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime_type))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    max_images: Option<usize>,
    accepted_mime_types: Option<Vec<String>>,
    preview_scheme: Option<String>,
}

pub fn load_settings() -> EditorSettings {
    let settings = load_settings_from(Path::new(SETTINGS_FILE));
    apply_env_overrides(settings, |key| std::env::var(key).ok())
}

/// Defaults overlaid with whatever the file provides. A missing or malformed
/// file leaves the defaults in place.
pub fn load_settings_from(path: &Path) -> EditorSettings {
    let mut settings = EditorSettings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    let file_cfg = match toml::from_str::<SettingsFile>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring malformed editor settings file");
            return settings;
        }
    };

    if let Some(v) = file_cfg.max_images {
        settings.max_images = clamp_max_images(v);
    }
    if let Some(v) = file_cfg.accepted_mime_types {
        settings.accepted_mime_types = v;
    }
    if let Some(v) = file_cfg.preview_scheme {
        settings.preview_scheme = v;
    }

    settings
}

pub fn apply_env_overrides(
    mut settings: EditorSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> EditorSettings {
    if let Some(v) = lookup("APP__MAX_IMAGES") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.max_images = clamp_max_images(parsed),
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__MAX_IMAGES"),
        }
    }

    if let Some(v) = lookup("APP__ACCEPTED_MIME_TYPES") {
        settings.accepted_mime_types = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(v) = lookup("APP__PREVIEW_SCHEME") {
        settings.preview_scheme = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
