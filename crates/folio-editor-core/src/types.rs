//! Selection and caret affinity.
//!
//! These types are surface-agnostic. The raw-HTML surface measures offsets in
//! characters of the markup, the visual surface in characters of the visible
//! text; both reuse the same selection type.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Cursor affinity at markup boundaries.
///
/// A visible-text position that sits between two text runs (for example right
/// after `</strong>`) corresponds to several source positions. `Before` sticks
/// to the end of the preceding run, `After` to the start of the following one.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    #[default]
    Before,
    After,
}

/// A selection as the browser reports it: `anchor` stays put while `head`
/// follows the caret, so the two may come in either order.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A bare caret.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Head before anchor (selected right to left).
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }

    /// Clamp both ends to `max`, keeping direction. Used when content
    /// shrank underneath a stored selection.
    pub fn clamp(self, max: usize) -> Self {
        Self::new(self.anchor.min(max), self.head.min(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 10);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(!sel.is_backwards());

        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(7);
        assert!(sel.is_collapsed());
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert_eq!(sel.start(), 7);
        assert_eq!(sel.end(), 7);
    }

    #[test]
    fn test_selection_clamp_keeps_direction() {
        let sel = Selection::new(12, 3).clamp(8);
        assert_eq!(sel, Selection::new(8, 3));
        assert!(sel.is_backwards());
    }
}
