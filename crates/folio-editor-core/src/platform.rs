//! Platform abstraction for clipboard access.
//!
//! The browser crate implements this over the DOM clipboard; the in-memory
//! implementation backs tests and the CLI.

use std::cell::RefCell;

use crate::paste::ClipboardPayload;

/// A clipboard or DOM call the host refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Clipboard access, supplied by the host.
pub trait ClipboardPlatform {
    /// Write plain text (the serialized HTML, for "copy HTML").
    fn write_text(&self, text: &str) -> Result<(), PlatformError>;

    /// Read whatever the clipboard currently offers, if accessible.
    fn read_payload(&self) -> Option<ClipboardPayload>;
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    payload: RefCell<ClipboardPayload>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: ClipboardPayload) -> Self {
        Self {
            payload: RefCell::new(payload),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.payload.borrow().text.clone()
    }
}

impl ClipboardPlatform for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        *self.payload.borrow_mut() = ClipboardPayload::text(text);
        Ok(())
    }

    fn read_payload(&self) -> Option<ClipboardPayload> {
        let payload = self.payload.borrow();
        (!payload.is_empty()).then(|| payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.read_payload().is_none());

        clipboard.write_text("<p>x</p>").unwrap();
        assert_eq!(clipboard.text().as_deref(), Some("<p>x</p>"));
        assert_eq!(
            clipboard.read_payload(),
            Some(ClipboardPayload::text("<p>x</p>"))
        );
    }
}
