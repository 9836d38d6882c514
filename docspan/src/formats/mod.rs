//! Format implementations
//!
//! Each format parses its source into the node tree consumed by the converter.

pub mod markdown;
pub mod tokens;

pub use markdown::{MarkdownFormat, MarkdownOptions};
pub use tokens::TokensFormat;
