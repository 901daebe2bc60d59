use std::ops::Range;

use super::{Surface, SurfaceDocument, new_document, replace_all};
use crate::document::EditorDocument;
use crate::format::Markup;
use crate::html::{OffsetMap, TokenKind, balance_fragment, escape_text, is_void_element, tokenize};
use crate::types::{Affinity, Selection};

/// WYSIWYG surface.
///
/// Holds the HTML source and an offset map over it. Selections come in as
/// visible-text offsets, the way a DOM range reports them, and are resolved
/// to source positions through the map. After an edit the caret is pinned
/// to an exact source position so that typing continues where the edit
/// left off, even at a tag boundary.
pub struct VisualSurface {
    doc: SurfaceDocument,
    map: OffsetMap,
    selection: Option<Selection>,
    affinity: Affinity,
    pinned: Option<usize>,
    undo_depth: usize,
}

impl VisualSurface {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            doc: new_document("", undo_depth),
            map: OffsetMap::default(),
            selection: None,
            affinity: Affinity::Before,
            pinned: None,
            undo_depth,
        }
    }

    pub fn offset_map(&self) -> &OffsetMap {
        &self.map
    }

    /// Visible text, as `textContent` would report it.
    pub fn text(&self) -> &str {
        self.map.text()
    }

    pub fn affinity(&self) -> Affinity {
        self.affinity
    }

    /// Set a selection along with the side of a tag boundary a collapsed
    /// caret prefers.
    pub fn set_selection_with_affinity(
        &mut self,
        selection: Option<Selection>,
        affinity: Affinity,
    ) {
        self.selection = selection.map(|sel| sel.clamp(self.map.visible_len()));
        self.affinity = affinity;
        self.pinned = None;
    }

    /// Source range the current selection covers, or `None` without one.
    pub fn source_range(&self) -> Option<Range<usize>> {
        let sel = self.selection?;
        if sel.is_collapsed() {
            let at = self
                .pinned
                .unwrap_or_else(|| self.map.to_source(sel.head, self.affinity));
            return Some(at..at);
        }
        let start = self.map.to_source(sel.start(), Affinity::After);
        let end = self.map.to_source(sel.end(), Affinity::Before);
        Some(start..end.max(start))
    }

    /// Source span of the visible character at `visible`.
    fn char_source(&self, visible: usize) -> Option<Range<usize>> {
        let run = self
            .map
            .runs()
            .iter()
            .find(|r| r.visible.start <= visible && visible < r.visible.end)?;
        if run.visible.len() == run.source.len() {
            let at = run.source.start + (visible - run.visible.start);
            Some(at..at + 1)
        } else {
            Some(run.source.clone())
        }
    }

    fn rebuild(&mut self) {
        self.map = OffsetMap::build(&self.doc.content_string());
    }

    fn pin_caret(&mut self, source: usize) {
        self.rebuild();
        let source = source.min(self.map.source_len());
        self.pinned = Some(source);
        self.selection = Some(Selection::collapsed(self.map.to_visible(source)));
    }

    /// Replace a source range with `html`, keeping any element that the
    /// range only partially covers. Returns the source position right after
    /// the inserted fragment.
    fn splice(&mut self, range: Range<usize>, html: &str) -> Option<usize> {
        if range.is_empty() && html.is_empty() {
            return None;
        }
        let removed = self.doc.slice(range.clone()).unwrap_or_default();
        let (closers, openers) = unbalanced_tags(&removed);
        let replacement = format!("{closers}{html}{openers}");
        self.doc.replace(range.clone(), &replacement);
        Some(range.start + closers.chars().count() + html.chars().count())
    }

    fn splice_at_selection(&mut self, html: &str) -> bool {
        let range = self.source_range().unwrap_or_else(|| {
            let end = self.doc.len_chars();
            end..end
        });
        match self.splice(range, html) {
            Some(caret) => {
                self.pin_caret(caret);
                true
            }
            None => false,
        }
    }

    /// Adopt markup the browser produced by editing the DOM itself.
    pub fn set_html(&mut self, html: &str) -> bool {
        match replace_all(&mut self.doc, html) {
            Some(caret) => {
                self.pin_caret(caret);
                true
            }
            None => false,
        }
    }
}

/// Tags in a removed fragment that belong to elements extending past it:
/// end tags without a start (closing elements opened earlier) and start
/// tags without an end (opening elements that continue afterwards).
fn unbalanced_tags(fragment: &str) -> (String, String) {
    let mut closers = String::new();
    let mut open: Vec<(&str, &str)> = Vec::new();
    for token in tokenize(fragment) {
        match &token.kind {
            TokenKind::StartTag {
                name,
                self_closing: false,
                ..
            } if !is_void_element(name) => open.push((*name, token.source(fragment))),
            TokenKind::EndTag { name } => {
                match open.iter().rposition(|(n, _)| n.eq_ignore_ascii_case(name)) {
                    Some(pos) => open.truncate(pos),
                    None => closers.push_str(token.source(fragment)),
                }
            }
            _ => {}
        }
    }
    let openers = open.into_iter().map(|(_, src)| src).collect();
    (closers, openers)
}

impl Surface for VisualSurface {
    fn load(&mut self, content: &str) {
        self.doc = new_document(content, self.undo_depth);
        self.map = OffsetMap::build(content);
        self.selection = None;
        self.affinity = Affinity::Before;
        self.pinned = None;
    }

    fn content(&self) -> String {
        self.doc.content_string()
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.set_selection_with_affinity(selection, Affinity::Before);
    }

    fn insert_text(&mut self, text: &str) -> bool {
        self.splice_at_selection(&escape_text(text))
    }

    fn insert_markup(&mut self, html: &str) -> bool {
        self.splice_at_selection(&balance_fragment(html))
    }

    fn wrap_selection(&mut self, markup: &Markup) -> bool {
        let selected = match self.selection {
            Some(sel) if !sel.is_collapsed() => self.map.visible_slice(sel.to_range()),
            _ => String::new(),
        };
        let inner = if selected.is_empty() {
            markup.placeholder.to_string()
        } else {
            escape_text(&selected).into_owned()
        };
        self.splice_at_selection(&markup.wrap(&inner))
    }

    fn delete_backward(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if !sel.is_collapsed() {
            return self.splice_at_selection("");
        }
        let caret = match self.pinned {
            Some(source) => self.map.to_visible(source),
            None => sel.head,
        };
        if caret == 0 {
            return false;
        }
        let Some(range) = self.char_source(caret - 1) else {
            return false;
        };
        self.doc.delete(range.clone());
        self.pin_caret(range.start);
        true
    }

    fn delete_forward(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if !sel.is_collapsed() {
            return self.splice_at_selection("");
        }
        let caret = match self.pinned {
            Some(source) => self.map.to_visible(source),
            None => sel.head,
        };
        let Some(range) = self.char_source(caret) else {
            return false;
        };
        self.doc.delete(range.clone());
        self.pin_caret(range.start);
        true
    }

    fn undo(&mut self) -> bool {
        let Some(caret) = self.doc.undo() else {
            return false;
        };
        self.pin_caret(caret);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(caret) = self.doc.redo() else {
            return false;
        };
        self.pin_caret(caret);
        true
    }
}
