//! Tree-to-span conversion.
//!
//! # The High-Level Concept
//!
//! The converter walks a [`Node`] tree depth first and appends everything it
//! visits to one text buffer. Element boundaries cannot be known on the way
//! down, so each element is handled in two phases:
//!
//! 1. **Enter**: remember `start = len(buffer)`, append one placeholder unit
//!    (U+FFFC) and mark it with a `parse-token` annotation of type
//!    `<name>_open`.
//! 2. **Children**: text appends its literal value, nested elements repeat the
//!    two phases.
//! 3. **Leave**: append a second placeholder marked `<name>_close`, compute the
//!    element's attributes from the now complete subtree, and only then build
//!    and add the element's annotation over `[start, len(buffer))`.
//!
//! Annotations are never touched after they are added, so the query engine can
//! rely on them being immutable. Descendant intervals always nest inside their
//! ancestors' because children are appended strictly between the two
//! placeholders.
//!
//! The traversal runs on an explicit frame stack fed by [`Event`]s, so nesting
//! depth is limited by memory only.
//!
//! # Attributes
//!
//! Computed at leave time, each step overriding the previous:
//! - the open token's `attrs`, one string attribute per pair;
//! - `level` for headings (`h2` -> 2), `info` for blocks with an info string
//!   (entity decoded), `tight` for `*_list` elements, `alt` for opaque
//!   elements such as images;
//! - the patch returned by a custom [`AttributeHandler`] registered for the
//!   element's name.

mod attributes;
pub mod entities;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::document::{Annotation, Attributes, Document, PARSE_TOKEN};
use crate::error::{Error, Result};
use crate::tree::{Event, Node, Token, Walk};

/// Placeholder unit anchoring an element boundary.
pub const PLACEHOLDER: &str = "\u{FFFC}";

/// Error type custom handlers may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Per-element hook computing extra attributes from the open token.
///
/// The returned patch is merged over the computed attributes. Failures, and
/// patches with an empty key, abort the conversion with
/// [`Error::AttributeComputation`].
pub trait AttributeHandler: Send + Sync {
    fn attributes(&self, open: Option<&Token>) -> std::result::Result<Attributes, HandlerError>;
}

impl<F> AttributeHandler for F
where
    F: Fn(Option<&Token>) -> std::result::Result<Attributes, HandlerError> + Send + Sync,
{
    fn attributes(&self, open: Option<&Token>) -> std::result::Result<Attributes, HandlerError> {
        self(open)
    }
}

/// An element whose open placeholder has been emitted.
struct Frame<'a> {
    node: &'a Node,
    start: usize,
}

/// Builds a [`Document`] from a node tree.
pub struct Converter {
    handlers: HashMap<String, Box<dyn AttributeHandler>>,
    opaque: HashSet<String>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("Converter")
            .field("handlers", &handlers)
            .field("opaque", &self.opaque)
            .finish()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// A converter treating `image` as opaque and with no custom handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            opaque: ["image".to_string()].into_iter().collect(),
        }
    }

    /// Register a handler for elements called `name`, replacing any previous one.
    pub fn with_handler<H>(mut self, name: impl Into<String>, handler: H) -> Self
    where
        H: AttributeHandler + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Fold the children of `name` elements into their attributes instead of
    /// the buffer.
    pub fn with_opaque(mut self, name: impl Into<String>) -> Self {
        self.opaque.insert(name.into());
        self
    }

    /// Replace the whole opaque set.
    pub fn with_opaque_set<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opaque = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_opaque(&self, name: &str) -> bool {
        self.opaque.contains(name)
    }

    /// Convert a node tree.
    pub fn convert(&self, root: &Node) -> Result<Document> {
        self.convert_events(Walk::new(root, &self.opaque))
    }

    /// Convert a balanced event stream.
    ///
    /// A `Close` with nothing open, or opens left at the end of the stream,
    /// fail with [`Error::UnbalancedTree`].
    pub fn convert_events<'a, I>(&self, events: I) -> Result<Document>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        let mut doc = Document::new();
        let mut stack: Vec<Frame<'a>> = Vec::new();

        for event in events {
            match event {
                Event::Text(text) => {
                    doc.append(text);
                }
                Event::Open(node) => {
                    let start = doc.append(PLACEHOLDER).start;
                    doc.add_annotation(marker(&node.name, "_open", start))?;
                    log::trace!("open {} at {start}", node.name);
                    stack.push(Frame { node, start });
                }
                Event::Close => {
                    let frame = stack
                        .pop()
                        .ok_or_else(|| Error::unbalanced("close event with nothing open"))?;
                    let close = doc.append(PLACEHOLDER);
                    doc.add_annotation(marker(&frame.node.name, "_close", close.start))?;
                    let attributes = self.attributes_for(frame.node)?;
                    doc.add_annotation(
                        Annotation::new(frame.node.name.clone(), frame.start, close.end)
                            .with_attributes(attributes),
                    )?;
                    log::trace!("close {} at {}", frame.node.name, close.end);
                }
            }
        }

        if let Some(frame) = stack.last() {
            return Err(Error::unbalanced(format!(
                "{} element(s) never closed, innermost '{}'",
                stack.len(),
                frame.node.name
            )));
        }

        log::debug!(
            "converted {} annotations over {} units",
            doc.annotations().len(),
            doc.len()
        );
        Ok(doc)
    }

    fn attributes_for(&self, node: &Node) -> Result<Attributes> {
        let mut attributes = attributes::computed(node, self.is_opaque(&node.name));
        if let Some(handler) = self.handlers.get(&node.name) {
            let patch = handler
                .attributes(node.open.as_ref())
                .map_err(|err| Error::attribute(&node.name, err.to_string()))?;
            if patch.keys().any(String::is_empty) {
                return Err(Error::attribute(&node.name, "patch contains an empty key"));
            }
            attributes.extend(patch);
        }
        Ok(attributes)
    }
}

fn marker(name: &str, suffix: &str, at: usize) -> Annotation {
    Annotation::new(PARSE_TOKEN, at, at + 1).with_attribute("type", format!("{name}{suffix}"))
}
