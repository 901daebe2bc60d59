//! Bounded undo/redo for surface buffers.

use std::collections::VecDeque;
use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

use crate::text::TextBuffer;

/// Undo history over a buffer.
///
/// Stepping returns where the caret belongs afterwards: the end of the text
/// the step put back, or `None` when there was nothing to step.
pub trait History {
    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn undo(&mut self) -> Option<usize>;

    fn redo(&mut self) -> Option<usize>;
}

/// One recorded replacement: `removed` was at `at` and `inserted` took its
/// place. Pure insertions and deletions leave one side empty.
#[derive(Debug, Clone)]
struct Step {
    at: usize,
    removed: SmolStr,
    inserted: SmolStr,
}

impl Step {
    fn inserted_range(&self) -> Range<usize> {
        self.at..self.at + self.inserted.chars().count()
    }

    fn removed_range(&self) -> Range<usize> {
        self.at..self.at + self.removed.chars().count()
    }
}

/// A buffer that records every edit for undo.
///
/// A `replace` is one step, so wrapping a selection in markup (or a whole
/// textarea rewrite) undoes in one go. The oldest steps fall off past
/// `max_steps`; zero disables history.
#[derive(Clone)]
pub struct UndoableBuffer<T> {
    buffer: T,
    undo_stack: VecDeque<Step>,
    redo_stack: Vec<Step>,
    max_steps: usize,
}

impl<T: TextBuffer> UndoableBuffer<T> {
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    fn record(&mut self, at: usize, removed: SmolStr, inserted: &str) {
        self.redo_stack.clear();
        if self.max_steps == 0 {
            return;
        }
        self.undo_stack.push_back(Step {
            at,
            removed,
            inserted: inserted.to_smolstr(),
        });
        if self.undo_stack.len() > self.max_steps {
            self.undo_stack.pop_front();
        }
    }
}

impl<T: TextBuffer> TextBuffer for UndoableBuffer<T> {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.record(char_offset, SmolStr::default(), text);
        self.buffer.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let removed = self.buffer.slice(char_range.clone()).unwrap_or_default();
        self.record(char_range.start, removed, "");
        self.buffer.delete(char_range);
    }

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        let removed = self.buffer.slice(char_range.clone()).unwrap_or_default();
        self.record(char_range.start, removed, text);
        self.buffer.replace(char_range, text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        self.buffer.slice(char_range)
    }

    fn to_string(&self) -> String {
        self.buffer.to_string()
    }
}

impl<T: TextBuffer> History for UndoableBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self) -> Option<usize> {
        let step = self.undo_stack.pop_back()?;
        self.buffer.replace(step.inserted_range(), &step.removed);
        let caret = step.removed_range().end;
        self.redo_stack.push(step);
        Some(caret)
    }

    fn redo(&mut self) -> Option<usize> {
        let step = self.redo_stack.pop()?;
        self.buffer.replace(step.removed_range(), &step.inserted);
        let caret = step.inserted_range().end;
        self.undo_stack.push_back(step);
        Some(caret)
    }
}
