//! The text/annotation store.
//!
//! A [`Document`] owns one text buffer and one unordered collection of
//! [`Annotation`]s over it. The two are only ever mutated together: every buffer
//! edit shifts the annotations at or after the edit point so that each interval
//! stays within the buffer.
//!
//! Offsets are counted in Unicode scalar values. The buffer keeps its length in
//! chars alongside the `String` so appends stay O(len(text)).

pub mod annotation;
pub mod value;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::query::Selection;
pub use annotation::{Annotation, AnnotationId, PARSE_TOKEN};
pub use value::{Attributes, Value};

/// A text buffer plus the annotations over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    content: String,
    len: usize,
    annotations: Vec<Annotation>,
    key: u64,
    next_id: u64,
}

/// Source of document keys; see [`AnnotationId`].
static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(0);

fn next_document_key() -> u64 {
    NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed)
}

/// Canonical wire shape: `{ content, annotations }`.
#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    content: String,
    annotations: Vec<Annotation>,
}

impl TryFrom<DocumentRepr> for Document {
    type Error = Error;

    fn try_from(repr: DocumentRepr) -> Result<Self> {
        let mut doc = Document::from_text(&repr.content);
        for annotation in repr.annotations {
            doc.add_annotation(annotation)?;
        }
        Ok(doc)
    }
}

impl From<Document> for DocumentRepr {
    fn from(doc: Document) -> Self {
        DocumentRepr {
            content: doc.content,
            annotations: doc.annotations,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.annotations == other.annotations
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            len: 0,
            annotations: Vec::new(),
            key: next_document_key(),
            next_id: 0,
        }
    }

    /// Create a document over `text` with no annotations.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.append(text);
        doc
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Buffer length in Unicode scalar values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `text` to the buffer and return the range it now occupies.
    pub fn append(&mut self, text: &str) -> Range<usize> {
        let start = self.len;
        self.content.push_str(text);
        self.len += text.chars().count();
        start..self.len
    }

    /// Add an annotation, assigning it a fresh id.
    ///
    /// Fails with [`Error::InvalidRange`] when `start > end` or `end` lies past
    /// the buffer. Ranges are never clamped.
    pub fn add_annotation(&mut self, mut annotation: Annotation) -> Result<AnnotationId> {
        self.check_range(annotation.start, annotation.end)?;
        let id = AnnotationId {
            document: self.key,
            index: self.next_id,
        };
        self.next_id += 1;
        annotation.id = id;
        self.annotations.push(annotation);
        Ok(id)
    }

    /// All annotations. Order carries no meaning.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// The buffer text covered by `annotation`.
    pub fn text_of(&self, annotation: &Annotation) -> &str {
        let start = self.byte_offset(annotation.start.min(self.len));
        let end = self.byte_offset(annotation.end.min(self.len));
        &self.content[start..end.max(start)]
    }

    /// Select the annotations matching `predicate`.
    pub fn select<F>(&self, predicate: F) -> Selection<'_>
    where
        F: Fn(&Annotation) -> bool,
    {
        Selection::new(self.annotations.iter()).select(predicate)
    }

    /// Select every annotation.
    pub fn all(&self) -> Selection<'_> {
        Selection::new(self.annotations.iter())
    }

    /// Remove the annotations with the given ids; returns how many were removed.
    pub fn remove_annotations<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = AnnotationId>,
    {
        let ids: HashSet<AnnotationId> = ids.into_iter().collect();
        let before = self.annotations.len();
        self.annotations.retain(|a| !ids.contains(&a.id));
        before - self.annotations.len()
    }

    /// Insert `text` at offset `at`, shifting boundaries at or after `at`.
    pub fn insert_text(&mut self, at: usize, text: &str) -> Result<()> {
        self.check_range(at, at)?;
        let n = text.chars().count();
        let byte = self.byte_offset(at);
        self.content.insert_str(byte, text);
        self.len += n;
        for annotation in &mut self.annotations {
            if annotation.start >= at {
                annotation.start += n;
            }
            if annotation.end >= at {
                annotation.end += n;
            }
        }
        Ok(())
    }

    /// Delete the text in `range`, pulling later boundaries back.
    ///
    /// Boundaries inside the deleted range collapse onto `range.start`.
    pub fn delete_text(&mut self, range: Range<usize>) -> Result<()> {
        self.check_range(range.start, range.end)?;
        let n = range.end - range.start;
        if n == 0 {
            return Ok(());
        }
        let start_byte = self.byte_offset(range.start);
        let end_byte = self.byte_offset(range.end);
        self.content.replace_range(start_byte..end_byte, "");
        self.len -= n;
        let shift = |x: usize| {
            if x <= range.start {
                x
            } else if x >= range.end {
                x - n
            } else {
                range.start
            }
        };
        for annotation in &mut self.annotations {
            annotation.start = shift(annotation.start);
            annotation.end = shift(annotation.end);
        }
        Ok(())
    }

    /// A copy without parse-token markers and without the placeholder units
    /// they cover.
    ///
    /// Runs in one pass over the buffer. A boundary maps to the number of kept
    /// units before it, which is where [`Document::delete_text`] would leave
    /// it after deleting every marker range: boundaries inside a removed run
    /// collapse onto its start.
    pub fn canonical(&self) -> Document {
        let mut removed: Vec<usize> = self
            .annotations
            .iter()
            .filter(|a| a.is_parse_token())
            .flat_map(|a| a.start..a.end)
            .collect();
        removed.sort_unstable();
        removed.dedup();

        let mut content = String::with_capacity(self.content.len());
        let mut pending = removed.iter().peekable();
        for (index, ch) in self.content.chars().enumerate() {
            if pending.next_if(|&&at| at == index).is_some() {
                continue;
            }
            content.push(ch);
        }

        let key = next_document_key();
        let shift = |x: usize| x - removed.partition_point(|&at| at < x);
        let annotations: Vec<Annotation> = self
            .annotations
            .iter()
            .filter(|a| !a.is_parse_token())
            .map(|a| Annotation {
                id: AnnotationId {
                    document: key,
                    index: a.id.index,
                },
                start: shift(a.start),
                end: shift(a.end),
                ..a.clone()
            })
            .collect();
        log::debug!(
            "canonicalized {} units into {}",
            self.len,
            self.len - removed.len()
        );

        Document {
            content,
            len: self.len - removed.len(),
            annotations,
            key,
            next_id: self.next_id,
        }
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.len {
            return Err(Error::invalid_range(start, end, self.len));
        }
        Ok(())
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.content
            .char_indices()
            .nth(chars)
            .map_or(self.content.len(), |(i, _)| i)
    }
}
