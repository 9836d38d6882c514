//! Offset annotations over a text buffer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use super::value::{Attributes, Value};

/// Type tag of the structural open/close markers emitted by the converter.
pub const PARSE_TOKEN: &str = "parse-token";

/// Identity of an annotation: the document that assigned it plus a sequence
/// number within that document.
///
/// Every [`Document`](crate::Document) draws a fresh document key, so ids
/// from different documents never collide, including after a cross-document
/// [`Selection::union`](crate::Selection::union). A cloned document keeps its
/// key: the clone's ids name the corresponding annotations of the copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId {
    pub(crate) document: u64,
    pub(crate) index: u64,
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.document, self.index)
    }
}

/// A typed, attributed half-open interval `[start, end)` over a text buffer.
///
/// Offsets count Unicode scalar values, not bytes. Equality compares type,
/// attributes and interval; the [`AnnotationId`] is identity only and is
/// assigned when the annotation is added to a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(skip)]
    pub(crate) id: AnnotationId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub start: usize,
    pub end: usize,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            id: AnnotationId::default(),
            kind: kind.into(),
            attributes: Attributes::new(),
            start,
            end,
        }
    }

    /// Replace the attribute bag.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set a single attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is one of the converter's open/close markers.
    pub fn is_parse_token(&self) -> bool {
        self.kind == PARSE_TOKEN
    }

    /// Exact interval coincidence, irrespective of type or attributes.
    pub fn is_aligned_with(&self, other: &Annotation) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Whether the two intervals share at least one unit.
    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies within this interval (boundaries inclusive).
    pub fn contains(&self, other: &Annotation) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.start == other.start
            && self.end == other.end
            && self.attributes == other.attributes
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}..{}", self.kind, self.start, self.end)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}
