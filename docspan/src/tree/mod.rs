//! Converter input: nodes, their token payloads, and the event stream.
//!
//! Producers hand the converter a [`Node`] tree. Producers that only have a
//! flat markdown-it style token stream rebuild the tree with
//! [`tokens_to_tree`]; producers that already emit balanced enter/leave steps
//! can bypass the tree and feed [`Event`]s directly.

pub mod events;
pub mod nodes;
pub mod tokens;

pub use events::{tree_to_events, Event, Walk};
pub use nodes::{Node, NodeKind, Token};
pub use tokens::tokens_to_tree;
