//! Converter input: the token payload and the node tree built from it.

use serde::{Deserialize, Deserializer, Serialize};

/// Name of literal text nodes.
pub const TEXT: &str = "text";
/// Name of soft line break nodes.
pub const SOFTBREAK: &str = "softbreak";
/// Name of the wrapper at the top of a produced tree.
pub const ROOT: &str = "root";
/// Name of inline wrappers, flattened into their parent.
pub const INLINE: &str = "inline";

/// A source token, shaped after the markdown-it token model.
///
/// The converter treats it as an opaque payload: it only reads `attrs`, `tag`,
/// `info` and `hidden` when computing attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attrs: Vec<(String, String)>,
    /// `1` opens a container, `-1` closes it, `0` is self-contained.
    pub nesting: i8,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub markup: String,
    #[serde(deserialize_with = "null_as_default")]
    pub info: String,
    pub block: bool,
    pub hidden: bool,
    pub children: Option<Vec<Token>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Token {
    pub fn new(kind: impl Into<String>, tag: impl Into<String>, nesting: i8) -> Self {
        Self {
            kind: kind.into(),
            tag: tag.into(),
            nesting,
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The element name this token opens or closes: `heading_open` -> `heading`.
    pub fn element_name(&self) -> &str {
        self.kind
            .strip_suffix("_open")
            .or_else(|| self.kind.strip_suffix("_close"))
            .unwrap_or(&self.kind)
    }
}

/// How the converter treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text, appended to the buffer as is.
    Text,
    /// A soft line break; adjacent ones collapse into one newline.
    SoftBreak,
    /// A wrapper with no annotation of its own.
    Transparent,
    /// An element that becomes an annotation.
    Element,
}

/// One element of the converter's input tree.
///
/// Children are owned. There is no parent pointer: the converter ascends with
/// its own traversal stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            name: TEXT.to_string(),
            open: None,
            close: None,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub fn softbreak() -> Self {
        Self::bare(SOFTBREAK, Vec::new())
    }

    /// The top-level wrapper returned by producers.
    pub fn root(children: Vec<Node>) -> Self {
        Self::bare(ROOT, children)
    }

    pub fn inline(children: Vec<Node>) -> Self {
        Self::bare(INLINE, children)
    }

    /// An element with no marker payload.
    pub fn element(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::bare(name, children)
    }

    /// An element bracketed by its open and close tokens.
    pub fn container(open: Token, close: Option<Token>, children: Vec<Node>) -> Self {
        Self {
            name: open.element_name().to_string(),
            open: Some(open),
            close,
            value: None,
            children,
        }
    }

    /// A self-contained token: open and close are the same token, and its
    /// content becomes the single synthetic text child.
    pub fn atomic(token: Token) -> Self {
        let content = if token.kind == "code_inline" {
            pad_code_span(&token.content)
        } else {
            token.content.clone()
        };
        Self {
            name: token.element_name().to_string(),
            open: Some(token.clone()),
            close: Some(token),
            value: None,
            children: vec![Node::text(content)],
        }
    }

    fn bare(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            open: None,
            close: None,
            value: None,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.name.as_str() {
            TEXT => NodeKind::Text,
            SOFTBREAK => NodeKind::SoftBreak,
            ROOT | INLINE => NodeKind::Transparent,
            _ => NodeKind::Element,
        }
    }

    /// Concatenation of every literal text value in this subtree, in order.
    pub fn collect_text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(value) = &node.value {
                out.push_str(value);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

impl Drop for Node {
    // Token streams can nest arbitrarily deep; drop children from a work list
    // so every node is released with no children of its own.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Keep a backtick at either edge of a code span from fusing with the
/// surrounding delimiters when the span is rendered again.
fn pad_code_span(content: &str) -> String {
    let mut padded = String::with_capacity(content.len() + 2);
    if content.starts_with('`') {
        padded.push(' ');
    }
    padded.push_str(content);
    if content.ends_with('`') {
        padded.push(' ');
    }
    padded
}
