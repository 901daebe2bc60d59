//! Event execution.
//!
//! `execute_event` is the single dispatch point from `EditorEvent` data to
//! `ContentEditor` operations, used by hosts that drive the editor from
//! recorded or serialized input.

use crate::actions::EditorEvent;
use crate::editor::ContentEditor;
use crate::types::Selection;

/// Apply one event to the editor.
///
/// Returns true if the event changed the committed content, which is also
/// exactly when change listeners were notified.
pub fn execute_event(editor: &mut ContentEditor, event: &EditorEvent) -> bool {
    let revision = editor.revision();
    tracing::trace!(target: "folio::editor", ?event, "executing event");

    match event {
        EditorEvent::Initialize { seed } => {
            editor.initialize(seed);
        }
        EditorEvent::Format { command, color } => {
            editor.apply_formatting(*command, color.as_deref());
        }
        EditorEvent::InsertMedia { url, alt_text } => {
            editor.insert_media(url, alt_text);
        }
        EditorEvent::OpenMediaDialog => editor.open_media_dialog(),
        EditorEvent::SelectMedia { item } => {
            editor.select_media(item);
        }
        EditorEvent::CancelMediaDialog => editor.cancel_media_dialog(),
        EditorEvent::ToggleMode => editor.toggle_mode(),
        EditorEvent::SetTab { tab } => editor.set_tab(*tab),
        EditorEvent::Paste(payload) => {
            editor.handle_paste(payload);
        }
        EditorEvent::InsertText { text } => {
            editor.insert_text(text);
        }
        EditorEvent::DeleteBackward => {
            editor.delete_backward();
        }
        EditorEvent::DeleteForward => {
            editor.delete_forward();
        }
        EditorEvent::Select {
            anchor,
            head,
            affinity,
        } => editor.set_selection(Some(Selection::new(*anchor, *head)), *affinity),
        EditorEvent::ClearSelection => editor.clear_selection(),
        EditorEvent::SetRawText { text } => {
            editor.set_raw_text(text);
        }
        EditorEvent::SyncVisualHtml { html } => {
            editor.sync_visual_html(html);
        }
        EditorEvent::Undo => {
            editor.undo();
        }
        EditorEvent::Redo => {
            editor.redo();
        }
    }

    editor.revision() != revision
}

/// Apply a sequence of events, returning how many changed the content.
pub fn execute_all<'a>(
    editor: &mut ContentEditor,
    events: impl IntoIterator<Item = &'a EditorEvent>,
) -> usize {
    events
        .into_iter()
        .filter(|event| execute_event(editor, event))
        .count()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::editor::{ActiveTab, DisplayMode};
    use crate::format::FormatCommand;
    use crate::paste::ClipboardPayload;

    #[test]
    fn test_replay_session() {
        let mut editor = ContentEditor::default();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        editor.subscribe(move |c: &str| sink.borrow_mut().push(c.to_owned()));

        let events = vec![
            EditorEvent::Initialize {
                seed: "<p>Hello</p>".into(),
            },
            EditorEvent::select(Selection::new(0, 5)),
            EditorEvent::Format {
                command: FormatCommand::Italic,
                color: None,
            },
            EditorEvent::ToggleMode,
            EditorEvent::SetRawText {
                text: "<p><em>Hello</em> there</p>".into(),
            },
            EditorEvent::SetTab {
                tab: ActiveTab::Preview,
            },
            EditorEvent::InsertText { text: "x".into() },
            EditorEvent::SetTab {
                tab: ActiveTab::Editor,
            },
            EditorEvent::ToggleMode,
        ];

        let changed = execute_all(&mut editor, &events);
        assert_eq!(changed, 2);
        assert_eq!(editor.mode(), DisplayMode::Visual);
        assert_eq!(editor.visual().text(), "Hello there");
        assert_eq!(
            *changes.borrow(),
            vec!["<p><em>Hello</em></p>", "<p><em>Hello</em> there</p>"]
        );
    }

    #[test]
    fn test_non_mutations_report_unchanged() {
        let mut editor = ContentEditor::default();
        assert!(!execute_event(
            &mut editor,
            &EditorEvent::Initialize {
                seed: "<p>a</p>".into()
            }
        ));
        assert!(!execute_event(&mut editor, &EditorEvent::OpenMediaDialog));
        assert!(editor.is_media_dialog_open());
        assert!(!execute_event(&mut editor, &EditorEvent::CancelMediaDialog));
        assert!(!execute_event(
            &mut editor,
            &EditorEvent::Paste(ClipboardPayload::default())
        ));
        assert!(execute_event(
            &mut editor,
            &EditorEvent::Paste(ClipboardPayload::text("b"))
        ));
        assert_eq!(editor.content(), "<p>a</p>b");
    }
}
