//! End-to-end conversion: node tree in, canonical annotated document out.
//!
//! The stages run in a fixed order:
//!
//! 1. **Convert** the tree with the configured [`Converter`].
//! 2. **Canonicalize**, when enabled: parse-token markers and the placeholder
//!    units they anchor are removed, see [`Document::canonical`].
//! 3. **Remap** every annotation into the target vocabulary.
//! 4. **Clean up**: each [`Cleanup`] edits the document in registration order,
//!    typically selecting shadow annotations with the query engine and
//!    removing them.

use crate::convert::Converter;
use crate::document::{Annotation, Document};
use crate::error::{FormatError, Result};
use crate::format::Format;
use crate::remap::{remap_document, Remap};
use crate::tree::Node;

/// A post-conversion document edit. Returns how many annotations it removed.
pub trait Cleanup: Send + Sync {
    fn apply(&self, doc: &mut Document) -> usize;
}

impl<F> Cleanup for F
where
    F: Fn(&mut Document) -> usize + Send + Sync,
{
    fn apply(&self, doc: &mut Document) -> usize {
        self(doc)
    }
}

/// Removes `shadow` annotations whose range equals an `anchor` annotation's.
///
/// Markdown has no underline, so some producers emit one alongside every
/// link; `DropAligned::new("underline", "link")` removes exactly those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAligned {
    pub shadow: String,
    pub anchor: String,
}

impl DropAligned {
    pub fn new(shadow: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            shadow: shadow.into(),
            anchor: anchor.into(),
        }
    }
}

impl Cleanup for DropAligned {
    fn apply(&self, doc: &mut Document) -> usize {
        let ids = {
            let anchors = doc.select(|a| a.kind == self.anchor).labeled("anchor");
            let shadows = doc.select(|a| a.kind == self.shadow).labeled("shadow");
            anchors
                .join(&shadows, Annotation::is_aligned_with)
                .ids_for("shadow")
                .unwrap_or_default()
        };
        let removed = doc.remove_annotations(ids);
        log::debug!(
            "dropped {removed} '{}' aligned with '{}'",
            self.shadow,
            self.anchor
        );
        removed
    }
}

/// Ordered conversion stages applied to every input.
pub struct Pipeline {
    converter: Converter,
    canonicalize: bool,
    remap: Option<Box<dyn Remap>>,
    cleanups: Vec<Box<dyn Cleanup>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("converter", &self.converter)
            .field("canonicalize", &self.canonicalize)
            .field("remap", &self.remap.is_some())
            .field("cleanups", &self.cleanups.len())
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Converter::new())
    }
}

impl Pipeline {
    /// A pipeline that canonicalizes, with no remap and no cleanups.
    pub fn new(converter: Converter) -> Self {
        Self {
            converter,
            canonicalize: true,
            remap: None,
            cleanups: Vec::new(),
        }
    }

    /// Keep parse-token markers and placeholders in the output.
    pub fn raw(mut self) -> Self {
        self.canonicalize = false;
        self
    }

    pub fn canonicalize(mut self, enabled: bool) -> Self {
        self.canonicalize = enabled;
        self
    }

    pub fn with_remap<R: Remap + 'static>(mut self, remap: R) -> Self {
        self.remap = Some(Box::new(remap));
        self
    }

    pub fn with_cleanup<C: Cleanup + 'static>(mut self, cleanup: C) -> Self {
        self.cleanups.push(Box::new(cleanup));
        self
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Run every stage over `root`.
    pub fn run(&self, root: &Node) -> Result<Document> {
        let mut doc = self.converter.convert(root)?;
        if self.canonicalize {
            doc = doc.canonical();
        }
        if let Some(remap) = &self.remap {
            doc = remap_document(&doc, remap.as_ref())?;
        }
        let removed: usize = self
            .cleanups
            .iter()
            .map(|cleanup| cleanup.apply(&mut doc))
            .sum();
        log::debug!(
            "pipeline produced {} annotations over {} units ({removed} removed by cleanups)",
            doc.annotations().len(),
            doc.len()
        );
        Ok(doc)
    }

    /// Parse `source` with `format`, then run every stage.
    pub fn run_source(
        &self,
        format: &dyn Format,
        source: &str,
    ) -> std::result::Result<Document, FormatError> {
        let root = format.parse(source)?;
        Ok(self.run(&root)?)
    }
}
