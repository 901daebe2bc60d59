//! Browser event handling for the editor.
//!
//! `beforeinput` events the editor understands are cancelled and replayed
//! as `EditorEvent`s, so the committed content changes exactly once per
//! user action. Anything else is left to the browser and picked up from the
//! DOM by the following `input` event.

use folio_editor_core::{ContentEditor, EditorEvent, FormatCommand, execute_event};

use crate::clipboard::BrowserClipboard;
use crate::dom::ContentEditableHost;

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Event was handled, default browser behavior prevented.
    Handled,
    /// Event should be handled by the browser (composition, line breaks).
    PassThrough,
}

/// Map a W3C `inputType` to the editor event it stands for.
pub fn event_for_input(input_type: &str, data: Option<String>) -> Option<EditorEvent> {
    let format = |command| EditorEvent::Format {
        command,
        color: None,
    };
    let event = match input_type {
        "insertText" | "insertReplacementText" => EditorEvent::InsertText { text: data? },
        "deleteContentBackward" => EditorEvent::DeleteBackward,
        "deleteContentForward" => EditorEvent::DeleteForward,
        "historyUndo" => EditorEvent::Undo,
        "historyRedo" => EditorEvent::Redo,
        "formatBold" => format(FormatCommand::Bold),
        "formatItalic" => format(FormatCommand::Italic),
        "formatUnderline" => format(FormatCommand::Underline),
        "formatJustifyLeft" => format(FormatCommand::AlignLeft),
        "formatJustifyCenter" => format(FormatCommand::AlignCenter),
        "formatJustifyRight" => format(FormatCommand::AlignRight),
        "insertOrderedList" => format(FormatCommand::OrderedList),
        "insertUnorderedList" => format(FormatCommand::UnorderedList),
        "insertLink" => format(FormatCommand::Link),
        _ => return None,
    };
    Some(event)
}

/// Handle a `beforeinput` event on the visual surface.
pub fn handle_beforeinput(
    editor: &mut ContentEditor,
    host: &ContentEditableHost,
    evt: &web_sys::InputEvent,
) -> BeforeInputResult {
    if evt.is_composing() {
        return BeforeInputResult::PassThrough;
    }

    let input_type = evt.input_type();
    let Some(event) = event_for_input(&input_type, evt.data()) else {
        tracing::trace!(target: "folio::events", %input_type, "passing through to browser");
        return BeforeInputResult::PassThrough;
    };

    evt.prevent_default();
    host.sync_selection(editor);
    if execute_event(editor, &event) {
        host.refresh(editor);
    }
    BeforeInputResult::Handled
}

/// Handle an `input` event: adopt whatever the browser did to the DOM.
pub fn handle_input(editor: &mut ContentEditor, host: &ContentEditableHost) -> bool {
    host.sync_selection(editor);
    editor.sync_visual_html(&host.extract())
}

/// Handle a `paste` event on the visual surface.
pub fn handle_paste_event(
    editor: &mut ContentEditor,
    host: &ContentEditableHost,
    evt: &web_sys::ClipboardEvent,
) -> bool {
    evt.prevent_default();
    let payload = BrowserClipboard::from_event(evt).payload();
    host.sync_selection(editor);
    let changed = editor.handle_paste(&payload);
    if changed {
        host.refresh(editor);
    }
    changed
}
