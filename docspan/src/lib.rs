//! Annotated text interchange for structured documents
//!
//!     This crate turns a document tree into one flat text buffer plus a set of typed, attributed
//!     spans over it, and gives a small relational toolkit for querying and cleaning those spans.
//!
//!     TLDR: For format authors:
//!         - A format only has to produce a node tree (see tree/nodes.rs). Everything after that is shared.
//!         - Element names are whatever the producer uses. The markdown and tokens formats use markdown-it names.
//!         - Renaming into a target vocabulary happens afterwards, in remap.rs, never in the format.
//!
//! Architecture
//!
//!     The pipeline is a chain of pure stages (see ./pipeline.rs):
//!
//!         source --Format--> Node tree --Converter--> Document --canonical--> --remap--> --cleanups-->
//!
//!     This is a pure lib: it powers docspan-cli but supposes no shell environment. Logging goes
//!     through the `log` facade and is silent unless the binary installs a logger.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── document                # Text buffer + annotations (the store)
//!     ├── tree                    # Node/Token model, event walk, token stream rebuild
//!     ├── convert                 # Tree to spans, attribute computation
//!     ├── query.rs                # Selections and joins
//!     ├── remap.rs                # Vocabulary mapping
//!     ├── pipeline.rs             # Stage ordering, cleanups
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     └── formats
//!         ├── markdown            # comrak -> Node tree
//!         └── tokens              # markdown-it token JSON -> Node tree
//!
//! Core Algorithms
//!
//!     Two algorithms do the heavy lifting, both iterative so nesting depth is bounded by memory:
//!
//!     - Tree to spans (./convert/mod.rs): each element emits an open placeholder, its children,
//!       a close placeholder, and only then its annotation, once the extent is known.
//!     - Tokens to tree (./tree/tokens.rs): a stack rebuild of the nesting a markdown-it token
//!       stream encodes with `nesting: 1 / 0 / -1`.
//!
//! Offsets
//!
//!     All offsets are counted in Unicode scalar values (`char`s), never bytes. Placeholders are
//!     U+FFFC, one unit each. [`Document::canonical`] removes them together with the parse-token
//!     markers that anchor them.
//!
pub mod convert;
pub mod document;
pub mod error;
pub mod format;
pub mod formats;
pub mod pipeline;
pub mod query;
pub mod registry;
pub mod remap;
pub mod tree;

pub use convert::{AttributeHandler, Converter, HandlerError, PLACEHOLDER};
pub use document::{Annotation, AnnotationId, Attributes, Document, Value, PARSE_TOKEN};
pub use error::{Error, FormatError, Result};
pub use format::Format;
pub use pipeline::{Cleanup, DropAligned, Pipeline};
pub use query::{join, Join, Selection};
pub use registry::FormatRegistry;
pub use remap::{remap_document, Identity, Remap, TypeRule, VocabularyMap};
pub use tree::{tokens_to_tree, Event, Node, Token};
