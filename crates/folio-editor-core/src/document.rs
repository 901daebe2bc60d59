//! A surface's source document: buffer plus selection.
//!
//! `EditorDocument` is the editing seam both surfaces are written against.
//! Positions are chars of the HTML source; the visual surface translates
//! its visible-text positions before calling in.

use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;
use crate::types::Selection;
use crate::undo::History;

pub trait EditorDocument {
    type Buffer: TextBuffer + History;

    fn buffer(&self) -> &Self::Buffer;

    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    /// Selection in source chars. `None` means no cursor context.
    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    /// Insert at `offset`, returning the position after the inserted text.
    fn insert(&mut self, offset: usize, text: &str) -> usize {
        self.buffer_mut().insert(offset, text);
        offset + text.chars().count()
    }

    fn delete(&mut self, range: Range<usize>) -> usize {
        let start = range.start;
        self.buffer_mut().delete(range);
        start
    }

    /// Replace `range` as one undo step, returning the position after the
    /// replacement.
    fn replace(&mut self, range: Range<usize>, text: &str) -> usize {
        let start = range.start;
        self.buffer_mut().replace(range, text);
        start + text.chars().count()
    }

    /// Step back, leaving a caret where the step ended.
    fn undo(&mut self) -> Option<usize> {
        let caret = self.buffer_mut().undo()?;
        self.set_selection(Some(Selection::collapsed(caret)));
        Some(caret)
    }

    fn redo(&mut self) -> Option<usize> {
        let caret = self.buffer_mut().redo()?;
        self.set_selection(Some(Selection::collapsed(caret)));
        Some(caret)
    }
}

/// Field-backed `EditorDocument`.
#[derive(Clone)]
pub struct PlainEditor<T: TextBuffer + History> {
    buffer: T,
    selection: Option<Selection>,
}

impl<T: TextBuffer + History> PlainEditor<T> {
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            selection: None,
        }
    }
}

impl<T: TextBuffer + History> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &T {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut T {
        &mut self.buffer
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EditorRope;
    use crate::undo::UndoableBuffer;

    fn document(content: &str) -> PlainEditor<UndoableBuffer<EditorRope>> {
        PlainEditor::new(UndoableBuffer::new(EditorRope::from_str(content), 100))
    }

    #[test]
    fn test_edits_report_end_position() {
        let mut doc = document("<p>hello</p>");
        assert_eq!(doc.insert(8, " world"), 14);
        assert_eq!(doc.replace(3..8, "<b>hello</b>"), 15);
        assert_eq!(doc.content_string(), "<p><b>hello</b> world</p>");
        assert_eq!(doc.delete(15..21), 15);
        assert_eq!(doc.content_string(), "<p><b>hello</b></p>");
    }

    #[test]
    fn test_history_moves_caret() {
        let mut doc = document("<p>a</p>");
        doc.set_selection(Some(Selection::new(3, 4)));
        doc.replace(3..4, "<em>a</em>");

        assert_eq!(doc.undo(), Some(4));
        assert_eq!(doc.content_string(), "<p>a</p>");
        assert_eq!(doc.selection(), Some(Selection::collapsed(4)));

        assert_eq!(doc.redo(), Some(13));
        assert_eq!(doc.selection(), Some(Selection::collapsed(13)));
        assert_eq!(doc.redo(), None);
    }
}
