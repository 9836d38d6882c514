//! Error types for conversion and format operations

use thiserror::Error;

/// Result type for core docspan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or editing a [`Document`](crate::Document).
///
/// Every variant is fatal for the conversion attempt that produced it: there is
/// no partial document to resume from.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An annotation or edit range lies outside the buffer, or is reversed.
    #[error("invalid range {start}..{end} for buffer of len {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// A close event arrived with no matching open, or opens were left unclosed.
    #[error("unbalanced tree: {0}")]
    UnbalancedTree(String),

    /// A custom attribute handler failed or produced an unusable patch.
    #[error("attribute computation failed for '{node}': {message}")]
    AttributeComputation { node: String, message: String },
}

impl Error {
    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }

    pub(crate) fn unbalanced(msg: impl Into<String>) -> Self {
        Self::UnbalancedTree(msg.into())
    }

    pub(crate) fn attribute(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AttributeComputation {
            node: node.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the format layer around the core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The producer could not read its input
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The produced tree failed to convert
    #[error("Conversion error: {0}")]
    Conversion(#[from] Error),
}
