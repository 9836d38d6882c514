//! Vocabulary remapping between source-specific and canonical annotation types.
//!
//! A remap is a pure function applied to one annotation at a time: one
//! annotation in, zero or more out, with no state shared between calls.
//!
//! # Example
//!
//! ```ignore
//! let mut vocabulary = VocabularyMap::new();
//! vocabulary.add("em", TypeRule::to("italic"));
//! vocabulary.add("link", TypeRule::to("link").rename("href", "url"));
//!
//! let canonical = remap_document(&doc, &vocabulary)?;
//! ```

use std::collections::HashMap;

use crate::document::{Annotation, Attributes, Document, Value};
use crate::error::Result;

/// Per-annotation mapping into another vocabulary.
pub trait Remap: Send + Sync {
    fn remap(&self, annotation: &Annotation) -> Vec<Annotation>;
}

impl<F> Remap for F
where
    F: Fn(&Annotation) -> Vec<Annotation> + Send + Sync,
{
    fn remap(&self, annotation: &Annotation) -> Vec<Annotation> {
        self(annotation)
    }
}

/// The remap that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Remap for Identity {
    fn remap(&self, annotation: &Annotation) -> Vec<Annotation> {
        vec![annotation.clone()]
    }
}

/// How one source type maps into the target vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeRule {
    pub target: String,
    /// Source attribute name -> target attribute name.
    pub renames: HashMap<String, String>,
    /// Attributes added to every mapped annotation.
    pub fixed: Attributes,
}

impl TypeRule {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    pub fn fixed(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fixed.insert(key.into(), value.into());
        self
    }

    fn apply(&self, annotation: &Annotation) -> Annotation {
        let mut attributes: Attributes = annotation
            .attributes
            .iter()
            .map(|(key, value)| {
                let key = self.renames.get(key).unwrap_or(key).clone();
                (key, value.clone())
            })
            .collect();
        attributes.extend(self.fixed.clone());
        Annotation::new(self.target.clone(), annotation.start, annotation.end)
            .with_attributes(attributes)
    }
}

/// Table-driven remap keyed by source type.
///
/// Types without a rule pass through unchanged unless `drop_unmapped` is set.
/// Parse-token markers always pass through, so a remapped raw document can
/// still be canonicalized.
#[derive(Debug, Clone, Default)]
pub struct VocabularyMap {
    rules: HashMap<String, TypeRule>,
    drop_unmapped: bool,
}

impl VocabularyMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// markdown-it element names to the canonical interchange vocabulary.
    #[must_use]
    pub fn commonmark() -> Self {
        let mut map = Self::new();
        map.add("heading", TypeRule::to("heading"));
        map.add("paragraph", TypeRule::to("paragraph"));
        map.add("blockquote", TypeRule::to("blockquote"));
        map.add(
            "bullet_list",
            TypeRule::to("list").fixed("type", "bulleted"),
        );
        map.add(
            "ordered_list",
            TypeRule::to("list")
                .fixed("type", "numbered")
                .rename("start", "startsAt"),
        );
        map.add("list_item", TypeRule::to("list-item"));
        map.add("fence", TypeRule::to("code-block"));
        map.add("code_block", TypeRule::to("code-block"));
        map.add("code_inline", TypeRule::to("code"));
        map.add("em", TypeRule::to("italic"));
        map.add("strong", TypeRule::to("bold"));
        map.add("s", TypeRule::to("strikethrough"));
        map.add("link", TypeRule::to("link").rename("href", "url"));
        map.add(
            "image",
            TypeRule::to("image")
                .rename("src", "url")
                .rename("alt", "description"),
        );
        map.add("hr", TypeRule::to("horizontal-rule"));
        map.add("hardbreak", TypeRule::to("line-break"));
        map.add("html_block", TypeRule::to("html").fixed("style", "block"));
        map.add("html_inline", TypeRule::to("html").fixed("style", "inline"));
        map.add("table", TypeRule::to("table"));
        map.add("tr", TypeRule::to("table-row"));
        map.add("th", TypeRule::to("table-cell").fixed("header", true));
        map.add("td", TypeRule::to("table-cell").fixed("header", false));
        map
    }

    /// Add or replace the rule for `source`.
    pub fn add(&mut self, source: impl Into<String>, rule: TypeRule) {
        self.rules.insert(source.into(), rule);
    }

    /// Drop annotations whose type has no rule instead of passing them through.
    pub fn drop_unmapped(mut self, drop: bool) -> Self {
        self.drop_unmapped = drop;
        self
    }

    #[must_use]
    pub fn rule(&self, source: &str) -> Option<&TypeRule> {
        self.rules.get(source)
    }

    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.rules.contains_key(source)
    }
}

impl Remap for VocabularyMap {
    fn remap(&self, annotation: &Annotation) -> Vec<Annotation> {
        if annotation.is_parse_token() {
            return vec![annotation.clone()];
        }
        match self.rules.get(&annotation.kind) {
            Some(rule) => vec![rule.apply(annotation)],
            None if self.drop_unmapped => Vec::new(),
            None => vec![annotation.clone()],
        }
    }
}

/// Apply `remap` to every annotation of `doc`, producing a new document over
/// the same content. Mapped annotations are re-validated against the buffer.
pub fn remap_document<R>(doc: &Document, remap: &R) -> Result<Document>
where
    R: Remap + ?Sized,
{
    let mut out = Document::from_text(doc.content());
    for annotation in doc.annotations() {
        for mapped in remap.remap(annotation) {
            out.add_annotation(mapped)?;
        }
    }
    log::debug!(
        "remapped {} annotations into {}",
        doc.annotations().len(),
        out.annotations().len()
    );
    Ok(out)
}
