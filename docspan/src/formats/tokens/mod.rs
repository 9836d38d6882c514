//! markdown-it token dumps
//!
//! Reads the JSON array markdown-it produces for `md.parse(source, {})` and
//! rebuilds the node tree with [`tokens_to_tree`]. Fields the converter does
//! not read (`map`, `level`, `meta`) are ignored, and `null` strings are read
//! as empty.

use crate::error::FormatError;
use crate::format::Format;
use crate::tree::{tokens_to_tree, Node, Token};

/// Format implementation for markdown-it token JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct TokensFormat;

impl Format for TokensFormat {
    fn name(&self) -> &str {
        "tokens"
    }

    fn description(&self) -> &str {
        "markdown-it token stream (JSON)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        let tokens: Vec<Token> = serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("invalid token stream: {e}")))?;
        log::debug!("read {} tokens", tokens.len());
        Ok(tokens_to_tree(&tokens)?)
    }
}
