//! Clipboard payload classification.

use serde::{Deserialize, Serialize};

use crate::html::{Sanitizer, looks_like_markup, parse_fragment};

/// What the clipboard offered for one paste.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ClipboardPayload {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.as_deref().is_none_or(str::is_empty)
            && self.text.as_deref().is_none_or(str::is_empty)
    }
}

/// Content ready for insertion into the visual surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteContent {
    /// Markup to splice in as-is.
    Html(String),
    /// Plain text; the surface escapes it.
    Text(String),
}

/// Decide how a payload is inserted into the visual surface.
///
/// Rich html wins. Plain text that looks like markup is parsed as a fragment
/// and inserted as html only if it parses cleanly; anything else is text.
/// Returns `None` for an empty payload.
pub fn classify_paste(
    payload: &ClipboardPayload,
    sanitizer: Option<&Sanitizer>,
) -> Option<PasteContent> {
    let clean = |html: &str| match sanitizer {
        Some(s) => s.sanitize(html),
        None => html.to_string(),
    };

    if let Some(html) = payload.html.as_deref().filter(|h| !h.is_empty()) {
        return Some(PasteContent::Html(clean(html)));
    }

    let text = payload.text.as_deref().filter(|t| !t.is_empty())?;
    if looks_like_markup(text) {
        match parse_fragment(text) {
            Ok(_) => return Some(PasteContent::Html(clean(text))),
            Err(err) => {
                tracing::debug!(
                    target: "folio::paste",
                    %err,
                    offset = err.offset(),
                    "markup-like text did not parse, pasting as text"
                );
            }
        }
    }
    Some(PasteContent::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_preferred() {
        let payload = ClipboardPayload {
            html: Some("<b>Bold</b>".into()),
            text: Some("Bold".into()),
        };
        assert_eq!(
            classify_paste(&payload, Some(&Sanitizer::default())),
            Some(PasteContent::Html("<b>Bold</b>".into()))
        );
    }

    #[test]
    fn test_comparison_text_is_not_markup() {
        let payload = ClipboardPayload::text("5 < 10 > 2");
        assert_eq!(
            classify_paste(&payload, None),
            Some(PasteContent::Text("5 < 10 > 2".into()))
        );
    }

    #[test]
    fn test_markup_text_parsed_as_html() {
        let payload = ClipboardPayload::text("<em>hi</em> there");
        assert_eq!(
            classify_paste(&payload, None),
            Some(PasteContent::Html("<em>hi</em> there".into()))
        );
    }

    #[test]
    fn test_broken_markup_text_falls_back() {
        let payload = ClipboardPayload::text("<a href=\"x>broken</a>");
        assert_eq!(
            classify_paste(&payload, None),
            Some(PasteContent::Text("<a href=\"x>broken</a>".into()))
        );
    }

    #[test]
    fn test_markup_text_is_sanitized() {
        let payload = ClipboardPayload::text("<p onclick=\"x()\">hi</p>");
        assert_eq!(
            classify_paste(&payload, Some(&Sanitizer::default())),
            Some(PasteContent::Html("<p>hi</p>".into()))
        );
    }

    #[test]
    fn test_empty_payload() {
        assert!(ClipboardPayload::default().is_empty());
        assert_eq!(classify_paste(&ClipboardPayload::default(), None), None);
        assert_eq!(classify_paste(&ClipboardPayload::html(""), None), None);
    }
}
