//! Enter/leave event stream over a node tree.
//!
//! # The Algorithm
//!
//! The walk flattens a [`Node`] tree into the stream the converter consumes.
//! It keeps an explicit stack of pending steps instead of recursing, so tree
//! depth is bounded by memory rather than by the call stack.
//!
//! 1. **Elements** emit `Open(node)`, schedule a `Close`, then schedule their
//!    children in reverse so they pop in document order. Opaque elements (such
//!    as images) skip the children: their text only feeds attributes.
//! 2. **Text** emits `Text(value)`.
//! 3. **Soft breaks** emit a single `"\n"`; a break directly following another
//!    break is dropped.
//! 4. **Transparent wrappers** (`root`, `inline`) schedule their children and
//!    emit nothing themselves.

use std::collections::HashSet;

use super::nodes::{Node, NodeKind};

/// A single step of a depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// Entering an element.
    Open(&'a Node),
    /// Literal text to append.
    Text(&'a str),
    /// Leaving the most recently opened element.
    Close,
}

enum Step<'a> {
    Visit(&'a Node),
    Leave,
}

/// Lazy depth-first walk over a node tree.
pub struct Walk<'a> {
    stack: Vec<Step<'a>>,
    opaque: &'a HashSet<String>,
    after_break: bool,
}

impl<'a> Walk<'a> {
    pub fn new(root: &'a Node, opaque: &'a HashSet<String>) -> Self {
        Self {
            stack: vec![Step::Visit(root)],
            opaque,
            after_break: false,
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        loop {
            let node = match self.stack.pop()? {
                Step::Leave => {
                    self.after_break = false;
                    return Some(Event::Close);
                }
                Step::Visit(node) => node,
            };
            match node.kind() {
                NodeKind::Text => {
                    let value = node.value.as_deref().unwrap_or_default();
                    if value.is_empty() {
                        continue;
                    }
                    self.after_break = false;
                    return Some(Event::Text(value));
                }
                NodeKind::SoftBreak => {
                    if self.after_break {
                        continue;
                    }
                    self.after_break = true;
                    return Some(Event::Text("\n"));
                }
                NodeKind::Transparent => {
                    self.stack
                        .extend(node.children.iter().rev().map(Step::Visit));
                }
                NodeKind::Element => {
                    self.stack.push(Step::Leave);
                    if !self.opaque.contains(&node.name) {
                        self.stack
                            .extend(node.children.iter().rev().map(Step::Visit));
                    }
                    self.after_break = false;
                    return Some(Event::Open(node));
                }
            }
        }
    }
}

/// Converts a node tree to a flat vector of events.
pub fn tree_to_events<'a>(root: &'a Node, opaque: &'a HashSet<String>) -> Vec<Event<'a>> {
    Walk::new(root, opaque).collect()
}
