//! Clipboard access for the visual surface.
//!
//! Paste data is read synchronously from the event's DataTransfer. "Copy
//! HTML" from the toolbar has no event to write through, so it goes to the
//! async Clipboard API instead.

use folio_editor_core::{ClipboardPayload, ClipboardPlatform, PlatformError};
use wasm_bindgen::JsValue;

/// Clipboard handle for one event, or for none.
pub struct BrowserClipboard {
    data_transfer: Option<web_sys::DataTransfer>,
}

impl BrowserClipboard {
    pub fn from_event(evt: &web_sys::ClipboardEvent) -> Self {
        Self {
            data_transfer: evt.clipboard_data(),
        }
    }

    /// For toolbar actions; writes go through `navigator.clipboard`.
    pub fn empty() -> Self {
        Self {
            data_transfer: None,
        }
    }

    /// Both representations the clipboard offers for a paste.
    pub fn payload(&self) -> ClipboardPayload {
        let Some(dt) = &self.data_transfer else {
            return ClipboardPayload::default();
        };
        let read = |format: &str| dt.get_data(format).ok().filter(|s| !s.is_empty());
        ClipboardPayload {
            html: read("text/html"),
            text: read("text/plain"),
        }
    }
}

impl ClipboardPlatform for BrowserClipboard {
    fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        if let Some(dt) = &self.data_transfer {
            return dt
                .set_data("text/plain", text)
                .map_err(|e| PlatformError(format!("clipboard write failed: {e:?}")));
        }

        let text = text.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = write_clipboard_text(&text).await {
                tracing::warn!(target: "folio::clipboard", "async clipboard write failed: {:?}", e);
            }
        });
        Ok(())
    }

    fn read_payload(&self) -> Option<ClipboardPayload> {
        let payload = self.payload();
        (!payload.is_empty()).then_some(payload)
    }
}

/// Write plain text through `navigator.clipboard`.
pub async fn write_clipboard_text(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = window.navigator().clipboard();
    let promise: js_sys::Promise = clipboard.write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    tracing::debug!(target: "folio::clipboard", "wrote {} bytes to clipboard", text.len());
    Ok(())
}
