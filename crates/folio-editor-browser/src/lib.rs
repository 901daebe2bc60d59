//! Browser DOM layer for the folio content editor.
//!
//! Hosts the visual surface in a contenteditable element and wires the
//! browser's input and clipboard events to `ContentEditor`. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `clipboard`: ClipboardEvent and async Clipboard API access
//! - `dom`: rendering, extraction and selection mapping for the host element
//! - `events`: beforeinput, input and paste handlers
//!
//! # Re-exports
//!
//! This crate re-exports `folio-editor-core` for convenience, so consumers
//! only need to depend on `folio-editor-browser`.

// Re-export core crate
pub use folio_editor_core;
pub use folio_editor_core::*;

pub mod clipboard;
pub mod dom;
pub mod events;

pub use clipboard::{BrowserClipboard, write_clipboard_text};
pub use dom::ContentEditableHost;
pub use events::{
    BeforeInputResult, event_for_input, handle_beforeinput, handle_input, handle_paste_event,
};
