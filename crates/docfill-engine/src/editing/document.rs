use serde::{Deserialize, Serialize};

use crate::editing::Span;
use crate::error::StageError;
use crate::models::Section;

/// Identifier of a document in a store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque revision token identifying one state of a remote document.
///
/// Every snapshot carries the revision it was read at and every batch carries
/// the revision its offsets were computed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(pub String);

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a store counts offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetUnit {
    /// UTF-8 bytes (local rope-backed documents)
    Utf8Bytes,
    /// UTF-16 code units (Google Docs indexes)
    Utf16CodeUnits,
}

impl OffsetUnit {
    /// Length of `text` in this unit
    pub fn measure(self, text: &str) -> usize {
        match self {
            OffsetUnit::Utf8Bytes => text.len(),
            OffsetUnit::Utf16CodeUnits => text.encode_utf16().count(),
        }
    }
}

/// A contiguous piece of text inside a block sharing one text style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub span: Option<Span>,
    pub text: String,
    pub bold: bool,
}

/// One structural unit of the document (a paragraph)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Absolute offsets, `None` when the store did not report them
    pub span: Option<Span>,
    /// Concatenated run text, including the trailing newline when present
    pub text: String,
    pub runs: Vec<TextRun>,
}

impl Block {
    /// Block with a single unstyled run covering the whole block
    pub fn plain(span: Span, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            span: Some(span),
            runs: vec![TextRun {
                span: Some(span),
                text: text.clone(),
                bold: false,
            }],
            text,
        }
    }

    /// The block's offsets, or `InvalidRange` if they were not readable
    pub fn span(&self, index: usize) -> Result<Span, StageError> {
        self.span.ok_or(StageError::InvalidRange { index })
    }

    /// Text with surrounding whitespace (including the newline) removed
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Trimmed, upper-cased text used for heading comparison
    pub fn normalized(&self) -> String {
        normalize_heading(&self.text)
    }

    /// The section this block is the heading of, if any
    pub fn heading(&self) -> Option<Section> {
        Section::from_label(&self.text)
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// True for divider lines holding only the separator glyph, optionally
    /// padded with a single space on either side
    pub fn is_bar(&self) -> bool {
        let line = self.text.trim_end_matches(['\n', '\r']);
        matches!(line, "|" | " |" | "| " | " | ")
    }
}

/// Trim and upper-case text for heading comparison
pub fn normalize_heading(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Read-only snapshot of a document as an ordered list of blocks.
///
/// Offsets are strictly increasing by block order and non-overlapping. A
/// snapshot is never mutated: stages compute edits against it and the
/// pipeline re-reads a fresh one after every applied batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetDocument {
    pub id: DocumentId,
    pub revision: Revision,
    pub unit: OffsetUnit,
    pub blocks: Vec<Block>,
}

impl OffsetDocument {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Full plain text of the document
    pub fn text(&self) -> String {
        self.blocks.iter().map(|b| b.text.as_str()).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.blocks.iter().any(|b| b.text.contains(needle))
    }

    /// Offset of the end of the last block with readable offsets
    pub fn end_offset(&self) -> Option<usize> {
        self.blocks.iter().rev().find_map(|b| b.span).map(|s| s.end)
    }

    /// Index of the first block at or after `from` whose heading is `section`
    pub fn find_heading(&self, section: Section, from: usize) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, b)| b.heading() == Some(section))
            .map(|(i, _)| i)
    }

    /// Index of the first block at or after `from` that is any heading other than `except`
    pub fn find_other_heading(&self, except: Section, from: usize) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, b)| matches!(b.heading(), Some(s) if s != except))
            .map(|(i, _)| i)
    }

    /// Index of the block whose span starts exactly at `offset`
    pub fn block_starting_at(&self, offset: usize) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.span.is_some_and(|s| s.start == offset))
    }

    /// Adjust a deletion range so it never removes the document's final newline.
    ///
    /// A range reaching the end of the document is moved one unit left so it
    /// swallows the preceding newline instead. Returns `None` when nothing
    /// deletable remains.
    pub fn deletable(&self, span: Span) -> Option<Span> {
        let adjusted = match self.end_offset() {
            Some(end) if span.end >= end => {
                if span.start == 0 || self.is_first_offset(span.start) {
                    Span::new(span.start, end.saturating_sub(1))
                } else {
                    span.shifted_left(1)
                }
            }
            _ => span,
        };
        (!adjusted.is_empty()).then_some(adjusted)
    }

    fn is_first_offset(&self, offset: usize) -> bool {
        self.blocks
            .iter()
            .find_map(|b| b.span)
            .is_some_and(|s| s.start == offset)
    }
}
