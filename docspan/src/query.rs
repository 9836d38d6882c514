//! Selections and joins over annotation collections.
//!
//! The operators compose rather than plan: select candidates of one kind, select
//! candidates of another, join them on a relation, and act on the result.
//!
//! ```ignore
//! let links = doc.select(|a| a.kind == "link").labeled("link");
//! let underlines = doc.select(|a| a.kind == "underline").labeled("underline");
//! let shadows = links.join(&underlines, Annotation::is_aligned_with);
//! let ids = shadows.ids_for("underline").unwrap_or_default();
//! doc.remove_annotations(ids);
//! ```
//!
//! Nothing here mutates its input. Selections borrow the annotations they
//! hold, so a selection can span several documents at once.

use crate::document::{Annotation, AnnotationId};

/// The result of filtering one or more annotation collections.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    label: Option<String>,
    annotations: Vec<&'a Annotation>,
}

impl<'a> Selection<'a> {
    pub fn new<I>(annotations: I) -> Self
    where
        I: IntoIterator<Item = &'a Annotation>,
    {
        Self {
            label: None,
            annotations: annotations.into_iter().collect(),
        }
    }

    /// Keep the annotations matching `predicate`, in input order.
    pub fn select<F>(&self, predicate: F) -> Selection<'a>
    where
        F: Fn(&Annotation) -> bool,
    {
        Selection {
            label: self.label.clone(),
            annotations: self
                .annotations
                .iter()
                .copied()
                .filter(|&a| predicate(a))
                .collect(),
        }
    }

    /// Name this selection so join results can refer to it.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Both selections' annotations, keeping this selection's label.
    ///
    /// `other` may come from another document. Annotation ids carry their
    /// document, so ids taken from the union stay unambiguous.
    pub fn union(mut self, other: Selection<'a>) -> Self {
        self.annotations.extend(other.annotations);
        self
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Annotation> + '_ {
        self.annotations.iter().copied()
    }

    pub fn ids(&self) -> Vec<AnnotationId> {
        self.annotations.iter().map(|a| a.id()).collect()
    }

    /// Pair every annotation here with every annotation in `other` for which
    /// `relation` holds.
    pub fn join<'b, R>(&self, other: &Selection<'b>, relation: R) -> Join<'a, 'b>
    where
        R: Fn(&Annotation, &Annotation) -> bool,
    {
        join(self, other, relation)
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = &'a Annotation;
    type IntoIter = std::vec::IntoIter<&'a Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.into_iter()
    }
}

/// Pairs produced by [`join`], remembering the labels of both sides.
#[derive(Debug, Clone)]
pub struct Join<'a, 'b> {
    left: Option<String>,
    right: Option<String>,
    pairs: Vec<(&'a Annotation, &'b Annotation)>,
}

impl<'a, 'b> Join<'a, 'b> {
    pub fn pairs(&self) -> &[(&'a Annotation, &'b Annotation)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Distinct ids on the left side, in pair order.
    pub fn left_ids(&self) -> Vec<AnnotationId> {
        distinct(self.pairs.iter().map(|(a, _)| a.id()))
    }

    /// Distinct ids on the right side, in pair order.
    pub fn right_ids(&self) -> Vec<AnnotationId> {
        distinct(self.pairs.iter().map(|(_, b)| b.id()))
    }

    /// Ids of the side labeled `label`, or `None` if neither side carries it.
    pub fn ids_for(&self, label: &str) -> Option<Vec<AnnotationId>> {
        if self.left.as_deref() == Some(label) {
            Some(self.left_ids())
        } else if self.right.as_deref() == Some(label) {
            Some(self.right_ids())
        } else {
            None
        }
    }
}

/// Every `(a, b)` from `left x right` with `relation(a, b)`, left-major.
pub fn join<'a, 'b, R>(left: &Selection<'a>, right: &Selection<'b>, relation: R) -> Join<'a, 'b>
where
    R: Fn(&Annotation, &Annotation) -> bool,
{
    let mut pairs = Vec::new();
    for &a in &left.annotations {
        for &b in &right.annotations {
            if relation(a, b) {
                pairs.push((a, b));
            }
        }
    }
    Join {
        left: left.label.clone(),
        right: right.label.clone(),
        pairs,
    }
}

fn distinct(ids: impl Iterator<Item = AnnotationId>) -> Vec<AnnotationId> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
