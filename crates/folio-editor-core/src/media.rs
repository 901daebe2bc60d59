//! Media catalog records and `<img>` insertion markup.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::EditorError;
use crate::html::escape_attr;

pub const DEFAULT_IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// A media library entry as the catalog service returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaItem {
    pub id: SmolStr,
    pub file_name: String,
    pub spaces_key: String,
    pub link: Option<String>,
    pub file_type: SmolStr,
    pub file_size: u64,
    pub alt_text: Option<String>,
}

impl MediaItem {
    /// Resolve what to insert for this item.
    ///
    /// A missing or blank link is an error; alt text falls back to the file
    /// name and then to `"image"`.
    pub fn insertion(&self) -> Result<MediaInsertion, EditorError> {
        let url = self
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(EditorError::MissingMediaUrl)?;

        let alt_text = self
            .alt_text
            .as_deref()
            .filter(|a| !a.is_empty())
            .or(Some(self.file_name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or("image");

        Ok(MediaInsertion::new(url, alt_text))
    }
}

/// A resolved image to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInsertion {
    pub url: String,
    pub alt_text: String,
}

impl MediaInsertion {
    pub fn new(url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: alt_text.into(),
        }
    }

    pub fn to_html(&self, style: &str) -> String {
        format!(
            r#"<img src="{}" alt="{}" style="{}" />"#,
            escape_attr(&self.url),
            escape_attr(&self.alt_text),
            escape_attr(style)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(link: Option<&str>, alt: Option<&str>, file_name: &str) -> MediaItem {
        MediaItem {
            id: "m1".into(),
            file_name: file_name.to_string(),
            link: link.map(str::to_string),
            alt_text: alt.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_alt_fallbacks() {
        let with_alt = item(Some("https://cdn/x.png"), Some("A cat"), "x.png");
        assert_eq!(with_alt.insertion().unwrap().alt_text, "A cat");

        let file_only = item(Some("https://cdn/x.png"), None, "x.png");
        assert_eq!(file_only.insertion().unwrap().alt_text, "x.png");

        let bare = item(Some("https://cdn/x.png"), Some(""), "");
        assert_eq!(bare.insertion().unwrap().alt_text, "image");
    }

    #[test]
    fn test_missing_link() {
        let err = item(None, Some("A cat"), "x.png").insertion().unwrap_err();
        assert!(matches!(err, EditorError::MissingMediaUrl));
        assert_eq!(err.to_string(), "No valid image link available");

        assert!(item(Some("   "), None, "x.png").insertion().is_err());
    }

    #[test]
    fn test_img_markup_escapes_attributes() {
        let insertion = MediaInsertion::new("https://cdn/a.png?x=1&y=2", "say \"hi\"");
        insta::assert_snapshot!(
            insertion.to_html(DEFAULT_IMAGE_STYLE),
            @r#"<img src="https://cdn/a.png?x=1&amp;y=2" alt="say &quot;hi&quot;" style="max-width: 100%; height: auto;" />"#
        );
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": "42",
            "fileName": "hero.jpg",
            "spacesKey": "tenant/hero.jpg",
            "link": "https://cdn.example.com/tenant/hero.jpg",
            "fileType": "image/jpeg",
            "fileSize": 1024,
            "altText": null
        }"#;
        let item: MediaItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.file_name, "hero.jpg");
        assert_eq!(item.file_size, 1024);
        assert_eq!(item.insertion().unwrap().alt_text, "hero.jpg");
    }
}
