//! Text edits derived from tree rewrites
//!
//! Hosts that cannot consume a new tree directly get the difference between
//! the old and new source text as a list of ordered, non-overlapping edits.
//!
//! # Example
//!
//! ```rust,ignore
//! use sable_core::text_edit::{apply_text_edits, derive_text_edits};
//!
//! let edits = derive_text_edits(old, new);
//! assert_eq!(apply_text_edits(old, &edits), new);
//! ```

use rowan::{TextRange, TextSize};
use similar::{DiffTag, TextDiff};
use std::ops::Range;

use crate::Span;

/// Represents a text edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range of the old text to replace
    pub range: TextRange,
    /// New text to insert
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Create an insertion edit
    pub fn insert(position: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(position), text)
    }

    /// Create a deletion edit
    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.range.is_empty() && self.new_text.is_empty()
    }

    /// Get the length change caused by this edit
    pub fn length_delta(&self) -> i64 {
        self.new_text.len() as i64 - u32::from(self.range.len()) as i64
    }

    pub fn span(&self) -> Span {
        Span::from(self.range)
    }
}

fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    let mut offset = 0;
    offsets.push(offset);
    for line in lines {
        offset += line.len();
        offsets.push(offset);
    }
    offsets
}

fn to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(range.start as u32),
        TextSize::from(range.end as u32),
    )
}

/// Diff `old` against `new` line by line
///
/// Adjacent changed hunks are merged, so the result is ordered by offset and
/// no two edits touch.
pub fn derive_text_edits(old: &str, new: &str) -> Vec<TextEdit> {
    let diff = TextDiff::from_lines(old, new);
    let old_offsets = line_offsets(diff.old_slices());
    let new_offsets = line_offsets(diff.new_slices());

    let mut edits = Vec::new();
    let mut pending: Option<(Range<usize>, Range<usize>)> = None;
    let mut flush = |pending: &mut Option<(Range<usize>, Range<usize>)>| {
        if let Some((old_lines, new_lines)) = pending.take() {
            let range = old_offsets[old_lines.start]..old_offsets[old_lines.end];
            let text = &new[new_offsets[new_lines.start]..new_offsets[new_lines.end]];
            edits.push(TextEdit::new(to_text_range(range), text));
        }
    };

    for op in diff.ops() {
        if op.tag() == DiffTag::Equal {
            flush(&mut pending);
            continue;
        }
        let (old_lines, new_lines) = (op.old_range(), op.new_range());
        pending = Some(match pending.take() {
            Some((o, n)) => (o.start..old_lines.end, n.start..new_lines.end),
            None => (old_lines, new_lines),
        });
    }
    flush(&mut pending);

    edits
}

/// Apply edits produced against `text`
///
/// Edits are applied back to front so earlier offsets stay valid.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| std::cmp::Reverse(edit.range.start()));

    let mut result = text.to_string();
    for edit in sorted {
        let range = usize::from(edit.range.start())..usize::from(edit.range.end());
        result.replace_range(range, &edit.new_text);
    }
    result
}
