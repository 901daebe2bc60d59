use std::ops::Range;

use super::{Surface, SurfaceDocument, new_document, replace_all};
use crate::document::EditorDocument;
use crate::format::Markup;
use crate::types::Selection;

/// Raw-HTML surface with textarea semantics.
///
/// Offsets are characters of the markup itself. A missing selection puts
/// the caret at the end, where a freshly assigned textarea leaves it.
pub struct RawSurface {
    doc: SurfaceDocument,
    undo_depth: usize,
}

impl RawSurface {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            doc: new_document("", undo_depth),
            undo_depth,
        }
    }

    pub fn document(&self) -> &SurfaceDocument {
        &self.doc
    }

    fn caret_range(&self) -> Range<usize> {
        match self.doc.selection() {
            Some(sel) => sel.clamp(self.doc.len_chars()).to_range(),
            None => {
                let end = self.doc.len_chars();
                end..end
            }
        }
    }

    fn place_caret(&mut self, offset: usize) {
        self.doc.set_selection(Some(Selection::collapsed(offset)));
    }

    /// Replace the whole textarea value, as an `input` event does.
    pub fn set_text(&mut self, text: &str) -> bool {
        match replace_all(&mut self.doc, text) {
            Some(caret) => {
                self.place_caret(caret);
                true
            }
            None => false,
        }
    }
}

impl Surface for RawSurface {
    fn load(&mut self, content: &str) {
        self.doc = new_document(content, self.undo_depth);
    }

    fn content(&self) -> String {
        self.doc.content_string()
    }

    fn selection(&self) -> Option<Selection> {
        self.doc.selection()
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        let len = self.doc.len_chars();
        self.doc.set_selection(selection.map(|sel| sel.clamp(len)));
    }

    fn insert_text(&mut self, text: &str) -> bool {
        let range = self.caret_range();
        if text.is_empty() && range.is_empty() {
            return false;
        }
        self.doc.replace(range.clone(), text);
        self.place_caret(range.start + text.chars().count());
        true
    }

    fn insert_markup(&mut self, html: &str) -> bool {
        if html.is_empty() {
            return false;
        }
        let at = self.caret_range().start;
        let caret = self.doc.insert(at, html);
        self.place_caret(caret);
        true
    }

    fn wrap_selection(&mut self, markup: &Markup) -> bool {
        let range = self.caret_range();
        let selected = self.doc.slice(range.clone()).unwrap_or_default();
        let open_len = markup.open.chars().count();

        if selected.is_empty() {
            self.doc
                .replace(range.clone(), &markup.wrap(markup.placeholder));
            let start = range.start + open_len;
            let end = start + markup.placeholder.chars().count();
            self.doc.set_selection(Some(Selection::new(start, end)));
        } else {
            self.doc.replace(range.clone(), &markup.wrap(&selected));
            self.place_caret(range.start + open_len + selected.chars().count());
        }
        true
    }

    fn delete_backward(&mut self) -> bool {
        let range = self.caret_range();
        let range = if range.is_empty() {
            if range.start == 0 {
                return false;
            }
            range.start - 1..range.start
        } else {
            range
        };
        self.doc.delete(range.clone());
        self.place_caret(range.start);
        true
    }

    fn delete_forward(&mut self) -> bool {
        let range = self.caret_range();
        let range = if range.is_empty() {
            if range.start >= self.doc.len_chars() {
                return false;
            }
            range.start..range.start + 1
        } else {
            range
        };
        self.doc.delete(range.clone());
        self.place_caret(range.start);
        true
    }

    fn undo(&mut self) -> bool {
        self.doc.undo().is_some()
    }

    fn redo(&mut self) -> bool {
        self.doc.redo().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatCommand;

    fn raw(content: &str) -> RawSurface {
        let mut surface = RawSurface::new(100);
        surface.load(content);
        surface
    }

    #[test]
    fn test_wrap_selection_verbatim() {
        let mut surface = raw("<p>Hello world</p>");
        surface.set_selection(Some(Selection::new(3, 8)));
        let markup = FormatCommand::Bold.markup(None).unwrap();

        assert!(surface.wrap_selection(&markup));
        assert_eq!(surface.content(), "<p><strong>Hello</strong> world</p>");
        // Caret after the wrapped text, before the closing tag.
        assert_eq!(surface.selection(), Some(Selection::collapsed(16)));
    }

    #[test]
    fn test_wrap_inserts_selected_placeholder() {
        let mut surface = raw("");
        let markup = FormatCommand::Heading2.markup(None).unwrap();

        assert!(surface.wrap_selection(&markup));
        assert_eq!(surface.content(), "<h2>Heading 2</h2>");
        assert_eq!(surface.selection(), Some(Selection::new(4, 13)));
    }

    #[test]
    fn test_markup_inserted_at_selection_start() {
        let mut surface = raw("<p>ab</p>");
        surface.set_selection(Some(Selection::new(4, 5)));
        assert!(surface.insert_markup("<br />"));
        assert_eq!(surface.content(), "<p>a<br />b</p>");
        assert_eq!(surface.selection(), Some(Selection::collapsed(10)));
    }

    #[test]
    fn test_no_selection_appends() {
        let mut surface = raw("<p>x</p>");
        assert!(surface.insert_markup("<hr>"));
        assert_eq!(surface.content(), "<p>x</p><hr>");
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut surface = raw("<p></p>");
        surface.set_selection(Some(Selection::collapsed(3)));
        assert!(surface.insert_text("hey"));
        assert_eq!(surface.content(), "<p>hey</p>");

        assert!(surface.delete_backward());
        assert_eq!(surface.content(), "<p>he</p>");
        assert!(surface.delete_forward());
        assert_eq!(surface.content(), "<p>he/p>");

        surface.set_selection(Some(Selection::collapsed(0)));
        assert!(!surface.delete_backward());
    }

    #[test]
    fn test_set_text_diffs_middle() {
        let mut surface = raw("<p>Hello</p>");
        assert!(surface.set_text("<p>Hello world</p>"));
        assert_eq!(surface.content(), "<p>Hello world</p>");
        assert_eq!(surface.selection(), Some(Selection::collapsed(14)));
        assert!(!surface.set_text("<p>Hello world</p>"));

        assert!(surface.undo());
        assert_eq!(surface.content(), "<p>Hello</p>");
        assert!(surface.redo());
        assert_eq!(surface.content(), "<p>Hello world</p>");
    }

    #[test]
    fn test_set_text_repeated_chars() {
        let mut surface = raw("aaa");
        assert!(surface.set_text("aaaa"));
        assert_eq!(surface.content(), "aaaa");
        assert!(surface.set_text("a"));
        assert_eq!(surface.content(), "a");
    }

    #[test]
    fn test_load_resets_history() {
        let mut surface = raw("a");
        surface.insert_text("b");
        surface.load("c");
        assert!(!surface.undo());
        assert_eq!(surface.content(), "c");
        assert_eq!(surface.selection(), None);
    }
}
