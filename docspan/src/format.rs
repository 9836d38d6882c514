//! Format trait definition
//!
//! A format turns source text into the node tree the converter consumes.
//! Everything downstream of [`Format::parse`] is format independent.

use crate::error::FormatError;
use crate::tree::Node;

/// Trait for source formats
///
/// # Examples
///
/// ```ignore
/// struct PlainText;
///
/// impl Format for PlainText {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn parse(&self, source: &str) -> Result<Node, FormatError> {
///         Ok(Node::root(vec![Node::element("paragraph", vec![Node::text(source)])]))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "tokens")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse source text into a `root` node tree
    fn parse(&self, source: &str) -> Result<Node, FormatError>;
}
