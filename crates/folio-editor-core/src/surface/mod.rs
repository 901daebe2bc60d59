//! The two editing surfaces over one HTML string.
//!
//! Both keep the HTML in the same undoable rope document. They differ in
//! how positions are measured: the raw surface counts characters of markup,
//! the visual surface counts characters of visible text.

mod raw;
mod visual;

pub use raw::RawSurface;
pub use visual::VisualSurface;

use crate::document::{EditorDocument, PlainEditor};
use crate::format::Markup;
use crate::text::EditorRope;
use crate::types::Selection;
use crate::undo::UndoableBuffer;

/// Document type backing both surfaces.
pub type SurfaceDocument = PlainEditor<UndoableBuffer<EditorRope>>;

pub(crate) fn new_document(content: &str, undo_depth: usize) -> SurfaceDocument {
    PlainEditor::new(UndoableBuffer::new(EditorRope::from_str(content), undo_depth))
}

/// Replace the whole document with `text`, rewriting only the span between
/// the common prefix and suffix so the change is one small undo step.
///
/// Returns the character offset just past the rewritten span, or `None`
/// when nothing changed.
pub(crate) fn replace_all(doc: &mut SurfaceDocument, text: &str) -> Option<usize> {
    let old = doc.content_string();
    if old == text {
        return None;
    }
    let prefix = old
        .chars()
        .zip(text.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let old_len = old.chars().count();
    let new_len = text.chars().count();
    let suffix = old
        .chars()
        .rev()
        .zip(text.chars().rev())
        .take_while(|(a, b)| a == b)
        .count()
        .min(old_len - prefix)
        .min(new_len - prefix);

    let inserted: String = text
        .chars()
        .skip(prefix)
        .take(new_len - prefix - suffix)
        .collect();
    doc.replace(prefix..old_len - suffix, &inserted);
    Some(prefix + inserted.chars().count())
}

/// Editing operations shared by both surfaces.
///
/// Mutating methods return `true` when the content changed.
pub trait Surface {
    /// Reinitialize from `content`, dropping selection and history.
    fn load(&mut self, content: &str);

    /// Serialize the surface back to HTML.
    fn content(&self) -> String;

    /// Current selection in this surface's offsets. `None` means there is
    /// no cursor context.
    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    /// Insert typed or pasted plain text, replacing the selection.
    fn insert_text(&mut self, text: &str) -> bool;

    /// Insert a markup fragment at the cursor, appending without one.
    fn insert_markup(&mut self, html: &str) -> bool;

    /// Wrap the selection in `markup`, or insert its placeholder.
    fn wrap_selection(&mut self, markup: &Markup) -> bool;

    fn delete_backward(&mut self) -> bool;

    fn delete_forward(&mut self) -> bool;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;
}
