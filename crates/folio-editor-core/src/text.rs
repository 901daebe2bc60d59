//! Char-indexed storage for a surface's HTML source.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// Editable text addressed in Unicode scalar values (chars).
///
/// Both surfaces measure positions in chars, never bytes or UTF-16, so
/// this is the only unit the buffer exposes.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn insert(&mut self, char_offset: usize, text: &str);

    fn delete(&mut self, char_range: Range<usize>);

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// `None` if the range is reversed or runs past the end.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    fn to_string(&self) -> String;
}

/// Ropey-backed buffer.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_markup() {
        let mut rope = EditorRope::from_str("<p>hello</p>");
        assert_eq!(rope.len_chars(), 12);

        rope.insert(8, " world");
        assert_eq!(rope.to_string(), "<p>hello world</p>");

        rope.replace(3..8, "<em>hello</em>");
        assert_eq!(rope.to_string(), "<p><em>hello</em> world</p>");

        rope.delete(17..23);
        assert_eq!(rope.to_string(), "<p><em>hello</em></p>");
    }

    #[test]
    fn test_offsets_are_chars() {
        let mut rope = EditorRope::from("<p>héllo</p>");
        assert_eq!(rope.len_chars(), 12);
        assert_eq!(rope.slice(3..8).as_deref(), Some("héllo"));
        rope.delete(4..5);
        assert_eq!(rope.to_string(), "<p>hllo</p>");
    }

    #[test]
    fn test_slice_out_of_range() {
        let rope = EditorRope::from_str("abc");
        assert_eq!(rope.slice(1..3).as_deref(), Some("bc"));
        assert_eq!(rope.slice(0..4), None);
        assert!(!rope.is_empty());
        assert!(EditorRope::new().is_empty());
    }
}
