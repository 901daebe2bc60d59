//! WASM browser tests for folio-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use folio_editor_browser::{
    ContentEditableHost, ContentEditor, EditorEvent, FormatCommand, Selection, Surface,
    event_for_input, handle_input,
};

fn make_host(html: &str) -> ContentEditableHost {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    element.set_attribute("contenteditable", "true").unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    let host = ContentEditableHost::new(element);
    host.render(html);
    host
}

// === inputType mapping ===

#[wasm_bindgen_test]
fn test_insert_text_maps() {
    assert_eq!(
        event_for_input("insertText", Some("a".into())),
        Some(EditorEvent::InsertText { text: "a".into() })
    );
    assert_eq!(event_for_input("insertText", None), None);
}

#[wasm_bindgen_test]
fn test_format_and_history_map() {
    assert_eq!(
        event_for_input("formatBold", None),
        Some(EditorEvent::Format {
            command: FormatCommand::Bold,
            color: None
        })
    );
    assert_eq!(event_for_input("historyUndo", None), Some(EditorEvent::Undo));
    assert_eq!(
        event_for_input("deleteContentBackward", None),
        Some(EditorEvent::DeleteBackward)
    );
}

#[wasm_bindgen_test]
fn test_unknown_passes_through() {
    assert_eq!(event_for_input("insertParagraph", None), None);
    assert_eq!(event_for_input("insertCompositionText", Some("x".into())), None);
}

// === Host element ===

#[wasm_bindgen_test]
fn test_render_and_extract() {
    let host = make_host("<p>Hello <strong>world</strong></p>");
    assert_eq!(host.extract(), "<p>Hello <strong>world</strong></p>");
}

#[wasm_bindgen_test]
fn test_selection_restore_across_elements() {
    let host = make_host("<p>Hello <strong>world</strong></p>");
    host.restore_selection(Some(Selection::new(2, 8))).unwrap();

    let (selection, _) = host.selection().unwrap();
    assert_eq!(selection, Selection::new(2, 8));

    let dom_selection = web_sys::window().unwrap().get_selection().unwrap().unwrap();
    assert_eq!(String::from(dom_selection.to_string()), "llo wo");
}

#[wasm_bindgen_test]
fn test_input_syncs_dom_into_editor() {
    let mut editor = ContentEditor::default();
    editor.initialize("<p>a</p>");
    let host = make_host("<p>ab</p>");

    assert!(handle_input(&mut editor, &host));
    assert_eq!(editor.content(), "<p>ab</p>");
    assert_eq!(editor.visual().content(), "<p>ab</p>");
    assert!(!handle_input(&mut editor, &host));
}

#[wasm_bindgen_test]
fn test_refresh_renders_visual_surface() {
    let mut editor = ContentEditor::default();
    editor.initialize("<p>Hi</p>");
    let host = make_host("");
    host.refresh(&editor);
    assert_eq!(host.extract(), "<p>Hi</p>");
}
