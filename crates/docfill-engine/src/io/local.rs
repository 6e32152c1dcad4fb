//! In-memory document store.
//!
//! Keeps each document in a single `xi_rope::Rope` buffer and compiles every
//! request into a `Delta`, so edits behave like a remote store's: offsets
//! shift after each request and bold ranges are carried through the delta
//! with a `Transformer`. Used by tests, benches and the CLI's `--local` mode.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::RegexBuilder;
use xi_rope::delta::{Builder, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{
    Batch, Block, DocumentId, EditRequest, OffsetDocument, OffsetUnit, Revision, Span, TextRun,
    merge_spans,
};
use crate::io::{DocumentFiles, DocumentStore, Role, StoreError};

/// One local document: text buffer, bold ranges and a version counter
#[derive(Debug, Clone)]
struct LocalDocument {
    buffer: Rope,
    bold: Vec<Span>,
    version: u64,
}

impl LocalDocument {
    fn new(text: &str) -> Self {
        let mut text = text.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Self {
            buffer: Rope::from(text),
            bold: Vec::new(),
            version: 0,
        }
    }

    fn revision(&self) -> Revision {
        Revision(self.version.to_string())
    }

    fn apply(&mut self, request: &EditRequest) -> Result<(), StoreError> {
        match request {
            EditRequest::ReplaceText {
                match_text,
                replacement,
                match_case,
            } => {
                if match_text.is_empty() {
                    return Ok(());
                }
                let matches = self.find_all(match_text, *match_case);
                if matches.is_empty() {
                    return Ok(());
                }
                let mut builder = Builder::new(self.buffer.len());
                for range in matches {
                    builder.replace(range, Rope::from(replacement.as_str()));
                }
                self.apply_delta(builder.build());
            }
            EditRequest::DeleteRange { span } => {
                self.check_range(*span)?;
                let mut builder = Builder::new(self.buffer.len());
                builder.delete(span.as_range());
                self.apply_delta(builder.build());
            }
            EditRequest::ApplyStyle { span, style } => {
                self.check_range(*span)?;
                if style.bold {
                    self.bold.push(*span);
                    self.bold = merge_spans(std::mem::take(&mut self.bold));
                }
            }
        }
        Ok(())
    }

    fn find_all(&self, needle: &str, match_case: bool) -> Vec<std::ops::Range<usize>> {
        let text = self.buffer.to_string();
        if match_case {
            return text
                .match_indices(needle)
                .map(|(i, m)| i..i + m.len())
                .collect();
        }
        match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re.find_iter(&text).map(|m| m.range()).collect(),
            Err(e) => {
                log::warn!("could not build case-insensitive matcher for {needle:?}: {e}");
                Vec::new()
            }
        }
    }

    fn check_range(&self, span: Span) -> Result<(), StoreError> {
        let len = self.buffer.len();
        if span.is_empty() || span.end > len {
            return Err(StoreError::InvalidRange { span, len });
        }
        Ok(())
    }

    fn apply_delta(&mut self, delta: Delta<RopeInfo>) {
        let mut transformer = Transformer::new(&delta);
        // Text inserted at either edge of a bold range stays unstyled
        let bold = self
            .bold
            .iter()
            .map(|span| Span {
                start: transformer.transform(span.start, true),
                end: transformer.transform(span.end, false),
            })
            .filter(|span| !span.is_empty())
            .collect();
        self.bold = merge_spans(bold);
        self.buffer = delta.apply(&self.buffer);
    }

    fn snapshot(&self, id: &DocumentId) -> OffsetDocument {
        let text = self.buffer.to_string();
        let mut blocks = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let span = Span::new(offset, offset + line.len());
            blocks.push(Block {
                span: Some(span),
                text: line.to_string(),
                runs: self.runs(&text, span),
            });
            offset = span.end;
        }

        OffsetDocument {
            id: id.clone(),
            revision: self.revision(),
            unit: OffsetUnit::Utf8Bytes,
            blocks,
        }
    }

    /// Split a paragraph into runs at bold boundaries
    fn runs(&self, text: &str, paragraph: Span) -> Vec<TextRun> {
        let mut cuts = vec![paragraph.start, paragraph.end];
        for span in self.bold.iter().filter(|s| s.overlaps(paragraph)) {
            cuts.push(span.start.max(paragraph.start));
            cuts.push(span.end.min(paragraph.end));
        }
        cuts.sort_unstable();
        cuts.dedup();

        cuts.windows(2)
            .map(|w| {
                let span = Span::new(w[0], w[1]);
                TextRun {
                    span: Some(span),
                    text: text.get(span.as_range()).unwrap_or_default().to_string(),
                    bold: self.bold.iter().any(|b| b.contains(span.start)),
                }
            })
            .collect()
    }

    /// Text with bold ranges wrapped in `**`
    fn render_marked(&self) -> String {
        let text = self.buffer.to_string();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &self.bold {
            out.push_str(&text[cursor..span.start]);
            out.push_str("**");
            out.push_str(&text[span.as_range()]);
            out.push_str("**");
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

/// Documents held in memory, addressed by id
#[derive(Debug, Default)]
pub struct LocalStore {
    documents: RefCell<HashMap<DocumentId, LocalDocument>>,
    grants: RefCell<Vec<(DocumentId, String, Role)>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new document made of `\n`-separated paragraphs
    pub fn insert(&self, id: impl Into<String>, text: &str) -> DocumentId {
        let id = DocumentId::new(id);
        self.documents
            .borrow_mut()
            .insert(id.clone(), LocalDocument::new(text));
        id
    }

    /// Plain text of a document
    pub fn text(&self, id: &DocumentId) -> Option<String> {
        self.documents
            .borrow()
            .get(id)
            .map(|doc| doc.buffer.to_string())
    }

    /// Text with bold ranges shown as `**bold**`
    pub fn render_marked(&self, id: &DocumentId) -> Option<String> {
        self.documents.borrow().get(id).map(LocalDocument::render_marked)
    }

    /// Number of batches applied to a document so far
    pub fn version(&self, id: &DocumentId) -> Option<u64> {
        self.documents.borrow().get(id).map(|doc| doc.version)
    }

    /// Permissions granted through `DocumentFiles::share`
    pub fn grants(&self) -> Vec<(DocumentId, String, Role)> {
        self.grants.borrow().clone()
    }
}

impl DocumentStore for LocalStore {
    fn get(&self, id: &DocumentId) -> Result<OffsetDocument, StoreError> {
        self.documents
            .borrow()
            .get(id)
            .map(|doc| doc.snapshot(id))
            .ok_or_else(|| StoreError::UnknownDocument(id.clone()))
    }

    fn batch_update(&self, id: &DocumentId, batch: &Batch) -> Result<(), StoreError> {
        let mut documents = self.documents.borrow_mut();
        let doc = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownDocument(id.clone()))?;

        if batch.base != doc.revision() {
            return Err(StoreError::StaleRevision {
                expected: batch.base.clone(),
                actual: doc.revision(),
            });
        }

        // All or nothing: edit a copy and commit only if every request applies
        let mut working = doc.clone();
        for request in &batch.requests {
            working.apply(request)?;
        }
        working.version += 1;
        *doc = working;
        Ok(())
    }
}

impl DocumentFiles for LocalStore {
    fn copy(&self, template: &DocumentId, title: &str) -> Result<DocumentId, StoreError> {
        let mut documents = self.documents.borrow_mut();
        let source = documents
            .get(template)
            .ok_or_else(|| StoreError::UnknownDocument(template.clone()))?;
        let mut copy = source.clone();
        copy.version = 0;
        let id = DocumentId::new(format!("{title}-{}", uuid::Uuid::new_v4().simple()));
        documents.insert(id.clone(), copy);
        Ok(id)
    }

    fn share(&self, document: &DocumentId, principal: &str, role: Role) -> Result<(), StoreError> {
        if !self.documents.borrow().contains_key(document) {
            return Err(StoreError::UnknownDocument(document.clone()));
        }
        self.grants
            .borrow_mut()
            .push((document.clone(), principal.to_string(), role));
        Ok(())
    }

    fn location(&self, document: &DocumentId) -> String {
        format!("local://{document}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn batch(store: &LocalStore, id: &DocumentId, requests: Vec<EditRequest>) -> Batch {
        Batch::new(store.get(id).unwrap().revision, requests)
    }

    #[test]
    fn test_snapshot_splits_paragraphs() {
        let store = LocalStore::new();
        let id = store.insert("doc", "Title\n\nBody");

        let doc = store.get(&id).unwrap();

        let texts: Vec<_> = doc.blocks().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Title\n", "\n", "Body\n"]);
        assert_eq!(doc.blocks()[2].span, Some(Span::new(7, 12)));
        assert_eq!(doc.unit, OffsetUnit::Utf8Bytes);
    }

    #[test]
    fn test_replace_all_occurrences_case_sensitive() {
        let store = LocalStore::new();
        let id = store.insert("doc", "{{a}} and {{a}} but {{A}}");

        let b = batch(&store, &id, vec![EditRequest::replace("{{a}}", "x")]);
        store.batch_update(&id, &b).unwrap();

        assert_eq!(store.text(&id).unwrap(), "x and x but {{A}}\n");
    }

    #[test]
    fn test_replace_case_insensitive() {
        let store = LocalStore::new();
        let id = store.insert("doc", "Foo foo FOO");

        let request = EditRequest::ReplaceText {
            match_text: "foo".to_string(),
            replacement: "bar".to_string(),
            match_case: false,
        };
        let b = batch(&store, &id, vec![request]);
        store.batch_update(&id, &b).unwrap();

        assert_eq!(store.text(&id).unwrap(), "bar bar bar\n");
    }

    #[test]
    fn test_requests_apply_sequentially() {
        let store = LocalStore::new();
        let id = store.insert("doc", "aa\nbb\ncc");

        // Descending offsets stay valid within one batch
        let b = batch(
            &store,
            &id,
            vec![
                EditRequest::delete(Span::new(6, 9)),
                EditRequest::delete(Span::new(0, 3)),
            ],
        );
        store.batch_update(&id, &b).unwrap();

        assert_eq!(store.text(&id).unwrap(), "bb\n");
    }

    #[test]
    fn test_bold_ranges_shift_with_edits() {
        let store = LocalStore::new();
        let id = store.insert("doc", "one two three");

        let b = batch(&store, &id, vec![EditRequest::bold(Span::new(8, 13))]);
        store.batch_update(&id, &b).unwrap();
        let b = batch(&store, &id, vec![EditRequest::delete(Span::new(0, 4))]);
        store.batch_update(&id, &b).unwrap();

        assert_eq!(store.render_marked(&id).unwrap(), "two **three**\n");
        let doc = store.get(&id).unwrap();
        let runs: Vec<_> = doc.blocks()[0]
            .runs
            .iter()
            .map(|r| (r.text.as_str(), r.bold))
            .collect();
        assert_eq!(runs, vec![("two ", false), ("three", true), ("\n", false)]);
    }

    #[test]
    fn test_stale_revision_is_rejected() {
        let store = LocalStore::new();
        let id = store.insert("doc", "abc");
        let stale = batch(&store, &id, vec![EditRequest::replace("a", "b")]);
        store.batch_update(&id, &stale).unwrap();

        let result = store.batch_update(&id, &stale);

        assert!(matches!(result, Err(StoreError::StaleRevision { .. })));
        assert_eq!(store.text(&id).unwrap(), "bbc\n");
    }

    #[test]
    fn test_failed_batch_leaves_document_untouched() {
        let store = LocalStore::new();
        let id = store.insert("doc", "abc");

        let b = batch(
            &store,
            &id,
            vec![
                EditRequest::replace("a", "z"),
                EditRequest::delete(Span::new(2, 99)),
            ],
        );
        let result = store.batch_update(&id, &b);

        assert!(matches!(result, Err(StoreError::InvalidRange { .. })));
        assert_eq!(store.text(&id).unwrap(), "abc\n");
        assert_eq!(store.version(&id), Some(0));
    }

    #[test]
    fn test_copy_and_share() {
        let store = LocalStore::new();
        let template = store.insert("template", "Hello {{name}}");

        let copy = store.copy(&template, "Ada").unwrap();
        store.share(&copy, "ada@example.com", Role::Writer).unwrap();

        assert_ne!(copy, template);
        assert_eq!(store.text(&copy), store.text(&template));
        assert_eq!(
            store.grants(),
            vec![(copy.clone(), "ada@example.com".to_string(), Role::Writer)]
        );
        assert!(store.location(&copy).starts_with("local://Ada-"));
    }
}
