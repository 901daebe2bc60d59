use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::{ColorOption, default_palette};
use crate::media::DEFAULT_IMAGE_STYLE;

pub const DEFAULT_PREVIEW_PLACEHOLDER: &str = "Your content preview will appear here...";

/// Editor settings.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo steps kept per surface. Zero disables undo.
    pub undo_depth: usize,
    /// Run pasted HTML through the allowlist cleaner.
    pub sanitize_paste: bool,
    /// Inline style put on inserted images.
    pub image_style: String,
    /// Shown by the preview tab when there is no content.
    pub preview_placeholder: String,
    /// Text-color choices offered by the toolbar.
    pub palette: Vec<ColorOption>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_depth: 100,
            sanitize_paste: true,
            image_style: DEFAULT_IMAGE_STYLE.to_owned(),
            preview_placeholder: DEFAULT_PREVIEW_PLACEHOLDER.to_owned(),
            palette: default_palette(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file, picking the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&read()?)?,
            Some("json") => Self::from_json_str(&read()?)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        tracing::debug!(target: "folio::config", path = %path.display(), "loaded editor config");
        Ok(config)
    }

    /// Look up a palette color by name, case-insensitively.
    pub fn color(&self, name: &str) -> Option<&str> {
        self.palette
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.value.as_str())
    }
}
