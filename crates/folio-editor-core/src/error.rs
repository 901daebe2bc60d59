//! Error types for the editor core.
//!
//! Editor operations themselves never fail past their boundary; they log and
//! fall back. These errors come out of the explicitly fallible helpers
//! (strict HTML parsing, media resolution, config loading).

use std::path::PathBuf;

use miette::Diagnostic;

/// Main error type for editor operations
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    /// The media collaborator returned an item without a usable link.
    #[error("No valid image link available")]
    #[diagnostic(code(folio::media::missing_link))]
    MissingMediaUrl,

    /// Malformed HTML fragment
    #[error(transparent)]
    #[diagnostic(transparent)]
    Html(#[from] HtmlError),

    /// Configuration could not be loaded
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Strict HTML fragment parse failures.
///
/// Offsets are byte offsets into the fragment.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HtmlError {
    #[error("unterminated tag starting at byte {offset}")]
    #[diagnostic(code(folio::html::unterminated_tag))]
    UnterminatedTag { offset: usize },

    #[error("unterminated comment starting at byte {offset}")]
    #[diagnostic(code(folio::html::unterminated_comment))]
    UnterminatedComment { offset: usize },

    #[error("unterminated attribute value starting at byte {offset}")]
    #[diagnostic(code(folio::html::unterminated_attribute))]
    UnterminatedAttribute { offset: usize },
}

impl HtmlError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedTag { offset }
            | Self::UnterminatedComment { offset }
            | Self::UnterminatedAttribute { offset } => *offset,
        }
    }
}

/// Configuration loading errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(folio::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(folio::config::toml))]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(code(folio::config::json))]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {}", path.display())]
    #[diagnostic(
        code(folio::config::format),
        help("use a .toml or .json file")
    )]
    UnsupportedFormat { path: PathBuf },
}
