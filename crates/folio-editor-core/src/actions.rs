//! Editor events.
//!
//! Every inbound operation the host can perform on the editor, as data.
//! Events serialize as JSON objects tagged by `op`, which is how the CLI
//! replays recorded sessions:
//!
//! ```json
//! [
//!   { "op": "initialize", "seed": "<p>Hello</p>" },
//!   { "op": "select", "anchor": 0, "head": 5 },
//!   { "op": "format", "command": "b" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::editor::ActiveTab;
use crate::format::FormatCommand;
use crate::media::MediaItem;
use crate::paste::ClipboardPayload;
use crate::types::{Affinity, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Seed from the form's value.
    Initialize { seed: String },

    /// Toolbar formatting command.
    Format {
        command: FormatCommand,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },

    /// Insert an image directly.
    #[serde(rename_all = "camelCase")]
    InsertMedia { url: String, alt_text: String },

    OpenMediaDialog,

    /// The media library returned a selection.
    SelectMedia { item: MediaItem },

    CancelMediaDialog,

    ToggleMode,

    SetTab { tab: ActiveTab },

    Paste(ClipboardPayload),

    /// Typed text.
    InsertText { text: String },

    DeleteBackward,

    DeleteForward,

    Select {
        anchor: usize,
        head: usize,
        #[serde(default)]
        affinity: Affinity,
    },

    ClearSelection,

    /// Full textarea value after an input event (raw-HTML mode).
    SetRawText { text: String },

    /// Visual surface markup after the browser edited the DOM itself.
    SyncVisualHtml { html: String },

    Undo,

    Redo,
}

impl EditorEvent {
    /// Whether the event can change content. Selection, dialog and
    /// navigation events never do.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Format { .. }
                | Self::InsertMedia { .. }
                | Self::SelectMedia { .. }
                | Self::Paste(_)
                | Self::InsertText { .. }
                | Self::DeleteBackward
                | Self::DeleteForward
                | Self::SetRawText { .. }
                | Self::SyncVisualHtml { .. }
                | Self::Undo
                | Self::Redo
        )
    }

    pub fn select(selection: Selection) -> Self {
        Self::Select {
            anchor: selection.anchor,
            head: selection.head,
            affinity: Affinity::Before,
        }
    }
}
