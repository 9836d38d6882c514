//! Markdown format implementation
//!
//! Parses CommonMark (plus the usual GitHub extensions) into the converter's
//! node tree.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing: CommonMark compliant, with
//! extensions (tables, strikethrough, autolinks, task lists) behind flags.
//!
//! # Element Mapping Table
//!
//! | Markdown                 | Element                      | Notes                                   |
//! |--------------------------|------------------------------|-----------------------------------------|
//! | `# Heading`              | `heading` (`h1`..`h6`)       | Level in the tag                        |
//! | Paragraph                | `paragraph`                  | Hidden inside tight lists               |
//! | `- item`                 | `bullet_list` / `list_item`  |                                         |
//! | `1. item`                | `ordered_list` / `list_item` | `start` attr when not 1                 |
//! | `- [x] task`             | `list_item`                  | `checked` attr                          |
//! | `> quote`                | `blockquote`                 |                                         |
//! | Fenced code              | `fence`                      | Atomic; info string kept on the token   |
//! | Indented code            | `code_block`                 | Atomic                                  |
//! | `---`                    | `hr`                         | Atomic, empty                           |
//! | HTML block / inline      | `html_block` / `html_inline` | Atomic, raw HTML as content             |
//! | Table                    | `table` / `tr` / `th` / `td` | Alignment as a `style` attr             |
//! | `*em*`, `**strong**`     | `em`, `strong`               |                                         |
//! | `~~strike~~`             | `s`                          |                                         |
//! | `` `code` ``             | `code_inline`                | Atomic                                  |
//! | `[text](url "title")`    | `link`                       | `href`, `title` attrs                   |
//! | `![alt](src)`            | `image`                      | Alt inlines kept as children            |
//! | Hard / soft line break   | `hardbreak` / `softbreak`    |                                         |
//!
//! Front matter is skipped. Block and inline kinds not listed above are
//! flattened into their parent.

pub mod parser;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::format::Format;
use crate::tree::Node;

/// Markdown extensions to enable while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub table: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            table: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
        }
    }
}

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        parser::parse_from_markdown(source, &self.options)
    }
}
