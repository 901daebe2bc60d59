//! Visible-text ↔ source offset mapping for the visual surface.
//!
//! The visual surface addresses positions the way a DOM selection does: by
//! characters of visible text. Markup is zero-width, a character reference
//! is as wide as the text it decodes to. Every stretch of visible text is a `TextRun`
//! that knows where it lives in the source.

use std::ops::Range;

use super::{ParseMode, TokenKind, Tokenizer, entity_at};
use crate::types::Affinity;

/// A contiguous stretch of visible text and its location in the source.
///
/// Plain runs map linearly. A run produced by a character reference spans
/// the whole reference in the source and is never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Visible-text character range.
    pub visible: Range<usize>,
    /// Source character range.
    pub source: Range<usize>,
}

impl TextRun {
    fn is_linear(&self) -> bool {
        self.visible.len() == self.source.len()
    }

    fn to_source(&self, visible: usize) -> usize {
        if visible >= self.visible.end {
            self.source.end
        } else if self.is_linear() {
            self.source.start + (visible - self.visible.start)
        } else {
            self.source.start
        }
    }
}

/// Mapping from visible offsets to source offsets for one HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    runs: Vec<TextRun>,
    text: String,
    visible_len: usize,
    source_len: usize,
}

impl OffsetMap {
    pub fn build(html: &str) -> Self {
        let mut runs = Vec::new();
        let mut text = String::new();
        let mut visible = 0usize;
        let mut source = 0usize;

        for token in Tokenizer::new(html, ParseMode::Lenient).flatten() {
            let raw = token.source(html);
            if token.kind != TokenKind::Text {
                source += raw.chars().count();
                continue;
            }

            let mut plain: Option<(usize, usize)> = None;
            let mut skip_until = 0;
            for (i, c) in raw.char_indices() {
                if i < skip_until {
                    continue;
                }
                if c == '&' {
                    if let Some((decoded, len)) = entity_at(raw, i) {
                        if let Some((v0, s0)) = plain.take() {
                            runs.push(TextRun {
                                visible: v0..visible,
                                source: s0..source,
                            });
                        }
                        let width = decoded.chars().count();
                        runs.push(TextRun {
                            visible: visible..visible + width,
                            source: source..source + len,
                        });
                        text.push_str(&decoded);
                        visible += width;
                        source += len;
                        skip_until = i + len;
                        continue;
                    }
                }
                plain.get_or_insert((visible, source));
                text.push(c);
                visible += 1;
                source += 1;
            }
            if let Some((v0, s0)) = plain {
                runs.push(TextRun {
                    visible: v0..visible,
                    source: s0..source,
                });
            }
        }

        Self {
            runs,
            text,
            visible_len: visible,
            source_len: source,
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Decoded visible text (`textContent`).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visible_len(&self) -> usize {
        self.visible_len
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Visible text in `range`, clamped to the document.
    pub fn visible_slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.visible_len);
        let end = range.end.clamp(start, self.visible_len);
        self.text.chars().skip(start).take(end - start).collect()
    }

    /// Translate a visible offset to a source offset.
    ///
    /// With no text at all, or for the end of the document under `After`,
    /// the position is the end of the source.
    pub fn to_source(&self, visible: usize, affinity: Affinity) -> usize {
        let visible = visible.min(self.visible_len);
        let run = match affinity {
            Affinity::Before => self
                .runs
                .iter()
                .find(|r| r.visible.start < visible && visible <= r.visible.end)
                .or_else(|| self.runs.iter().find(|r| r.visible.start == visible)),
            Affinity::After => self
                .runs
                .iter()
                .find(|r| r.visible.start <= visible && visible < r.visible.end),
        };
        run.map(|r| r.to_source(visible))
            .unwrap_or(self.source_len)
    }

    /// Translate a source offset to the number of visible characters that
    /// lie entirely before it.
    pub fn to_visible(&self, source: usize) -> usize {
        let mut visible = 0;
        for run in &self.runs {
            if run.source.end <= source {
                visible = run.visible.end;
            } else if run.source.start < source {
                return if run.is_linear() {
                    run.visible.start + (source - run.source.start)
                } else {
                    run.visible.start
                };
            } else {
                break;
            }
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_skip_markup() {
        let map = OffsetMap::build("<p>He<b>ll</b>o</p>");
        assert_eq!(map.text(), "Hello");
        assert_eq!(map.visible_len(), 5);
        assert_eq!(map.source_len(), 19);
        assert_eq!(
            map.runs(),
            &[
                TextRun {
                    visible: 0..2,
                    source: 3..5
                },
                TextRun {
                    visible: 2..4,
                    source: 8..10
                },
                TextRun {
                    visible: 4..5,
                    source: 14..15
                },
            ]
        );
    }

    #[test]
    fn test_affinity_at_tag_boundary() {
        let map = OffsetMap::build("<p>He<b>ll</b>o</p>");
        // Between "He" and "ll": before stays at the end of "He", after jumps inside <b>.
        assert_eq!(map.to_source(2, Affinity::Before), 5);
        assert_eq!(map.to_source(2, Affinity::After), 8);
        // End of document.
        assert_eq!(map.to_source(5, Affinity::Before), 15);
        assert_eq!(map.to_source(5, Affinity::After), 19);
        // Start of document stays inside the first element.
        assert_eq!(map.to_source(0, Affinity::Before), 3);
    }

    #[test]
    fn test_entities_are_one_visible_char() {
        let map = OffsetMap::build("a &amp; b");
        assert_eq!(map.text(), "a & b");
        assert_eq!(map.visible_len(), 5);
        assert_eq!(map.to_source(2, Affinity::After), 2);
        assert_eq!(map.to_source(3, Affinity::Before), 7);
        assert_eq!(map.to_visible(7), 3);
        assert_eq!(map.to_visible(4), 2);
    }

    #[test]
    fn test_empty_and_textless_fragments() {
        let map = OffsetMap::build("");
        assert_eq!(map.to_source(0, Affinity::Before), 0);

        let map = OffsetMap::build("<p></p><img src=\"x\">");
        assert_eq!(map.visible_len(), 0);
        assert_eq!(map.to_source(0, Affinity::Before), map.source_len());
    }

    #[test]
    fn test_to_visible_after_markup() {
        let map = OffsetMap::build("<p>He<b>ll</b>o</p>");
        // Right after </b> all of "Hell" is behind us.
        assert_eq!(map.to_visible(14), 4);
        assert_eq!(map.to_visible(19), 5);
        assert_eq!(map.to_visible(0), 0);
    }

    #[test]
    fn test_visible_slice_decodes() {
        let map = OffsetMap::build("<p>1 &lt; 2</p>");
        assert_eq!(map.visible_slice(0..5), "1 < 2");
        assert_eq!(map.visible_slice(2..99), "< 2");
    }

    #[test]
    fn test_any_named_reference_is_one_char() {
        let map = OffsetMap::build("<p>caf&eacute; ok</p>");
        assert_eq!(map.text(), "café ok");
        // "ok" starts after the whole reference.
        assert_eq!(map.to_source(5, Affinity::After), 15);
        assert_eq!(map.to_source(7, Affinity::Before), 17);

        let map = OffsetMap::build("<p>a &rarr; b</p>");
        assert_eq!(map.visible_len(), 5);
        assert_eq!(map.text(), "a → b");
    }

    #[test]
    fn test_unknown_reference_counts_literally() {
        let map = OffsetMap::build("&bogus;");
        assert_eq!(map.visible_len(), 7);
        assert_eq!(map.runs().len(), 1);
    }
}
