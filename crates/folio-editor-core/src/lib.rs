//! folio-editor-core: dual-mode HTML content editor logic without framework
//! dependencies.
//!
//! This crate provides:
//! - `TextBuffer` trait and the ropey-backed `EditorRope`
//! - `EditorDocument` with undo support, shared by both surfaces
//! - HTML tokenizing, the visible-text offset map and the paste sanitizer
//! - `ContentEditor`: visual and raw-HTML surfaces over one HTML string,
//!   formatting commands, paste handling and media insertion
//! - `EditorEvent` and `execute_event` for driving an editor from data

pub mod actions;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod execute;
pub mod format;
pub mod html;
pub mod media;
pub mod notify;
pub mod paste;
pub mod platform;
pub mod store;
pub mod surface;
pub mod text;
pub mod types;
pub mod undo;

pub use actions::EditorEvent;
pub use config::EditorConfig;
pub use document::{EditorDocument, PlainEditor};
pub use editor::{ActiveTab, ContentEditor, DisplayMode};
pub use error::{ConfigError, EditorError, HtmlError};
pub use execute::{execute_all, execute_event};
pub use format::{ColorOption, FormatCommand, Markup, default_palette};
pub use html::{OffsetMap, Sanitizer};
pub use media::{MediaInsertion, MediaItem};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use paste::{ClipboardPayload, PasteContent, classify_paste};
pub use platform::{ClipboardPlatform, MemoryClipboard, PlatformError};
pub use smol_str::SmolStr;
pub use store::{ChangeListener, ContentStore, FormField, ListenerId};
pub use surface::{RawSurface, Surface, VisualSurface};
pub use text::{EditorRope, TextBuffer};
pub use types::{Affinity, Selection};
pub use undo::{History, UndoableBuffer};
