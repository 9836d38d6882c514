//! Rebuilds a node tree from a flat, markdown-it style token stream.
//!
//! # The Algorithm
//!
//! A stack holds the containers that are currently open, each with the
//! children collected so far. Nodes finished with an empty stack belong to the
//! `root` wrapper.
//!
//! 1. **`nesting == 1`**: push a new container for the token.
//! 2. **`nesting == 0`**: build a leaf and add it to the container on top.
//!    - `text` becomes a text node, `softbreak` a soft break.
//!    - `inline` becomes a transparent wrapper over its `children`, rebuilt
//!      with this same algorithm.
//!    - `image` keeps its `children` (the alt inlines) under the element.
//!    - anything else is self-contained: see [`Node::atomic`].
//! 3. **`nesting == -1`**: pop the top container, check that the close token
//!    names the same element, and add the finished node to the new top.
//! 4. **Completion**: the stack must be empty.
//!
//! The stream is expected to come balanced from its producer; any violation is
//! reported as [`Error::UnbalancedTree`] and nothing is returned.

use crate::error::{Error, Result};

use super::nodes::{Node, Token, INLINE, ROOT, SOFTBREAK, TEXT};

struct Open {
    token: Token,
    children: Vec<Node>,
}

/// Converts a flat token stream into a `root` node.
pub fn tokens_to_tree(tokens: &[Token]) -> Result<Node> {
    let children = build(tokens)?;
    Ok(Node::root(children))
}

fn build(tokens: &[Token]) -> Result<Vec<Node>> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();

    for token in tokens {
        let node = match token.nesting {
            1 => {
                stack.push(Open {
                    token: token.clone(),
                    children: Vec::new(),
                });
                continue;
            }
            -1 => {
                let open = stack.pop().ok_or_else(|| {
                    Error::unbalanced(format!("'{}' closes nothing", token.kind))
                })?;
                if open.token.element_name() != token.element_name() {
                    return Err(Error::unbalanced(format!(
                        "expected close for '{}', found '{}'",
                        open.token.kind, token.kind
                    )));
                }
                Node::container(open.token, Some(token.clone()), open.children)
            }
            _ => leaf(token)?,
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.push(node),
        }
    }

    if let Some(innermost) = stack.last() {
        return Err(Error::unbalanced(format!(
            "{} container(s) left open, innermost '{}'",
            stack.len(),
            innermost.token.kind
        )));
    }
    Ok(root)
}

fn leaf(token: &Token) -> Result<Node> {
    let node = match token.kind.as_str() {
        TEXT => Node::text(token.content.clone()),
        SOFTBREAK => Node::softbreak(),
        INLINE => Node::inline(build(token.children.as_deref().unwrap_or_default())?),
        ROOT => Node::root(build(token.children.as_deref().unwrap_or_default())?),
        "image" => Node {
            name: token.element_name().to_string(),
            open: Some(token.clone()),
            close: Some(token.clone()),
            value: None,
            children: build(token.children.as_deref().unwrap_or_default())?,
        },
        _ => Node::atomic(token.clone()),
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(kind: &str, tag: &str) -> Token {
        Token::new(kind, tag, 1)
    }

    fn close(kind: &str, tag: &str) -> Token {
        Token::new(kind, tag, -1)
    }

    fn inline(children: Vec<Token>) -> Token {
        Token::new("inline", "", 0).with_children(children)
    }

    fn text(content: &str) -> Token {
        Token::new("text", "", 0).with_content(content)
    }

    #[test]
    fn rebuilds_nested_blocks_and_inlines() {
        let tokens = vec![
            open("heading_open", "h2"),
            inline(vec![
                open("em_open", "em"),
                text("a"),
                close("em_close", "em"),
                text("b"),
            ]),
            close("heading_close", "h2"),
        ];
        let tree = tokens_to_tree(&tokens).expect("balanced stream");

        assert_eq!(tree.name, ROOT);
        let heading = &tree.children[0];
        assert_eq!(heading.name, "heading");
        assert_eq!(heading.open.as_ref().map(|t| t.tag.as_str()), Some("h2"));
        let inline = &heading.children[0];
        assert_eq!(inline.name, INLINE);
        assert_eq!(inline.children[0].name, "em");
        assert_eq!(inline.children[0].children, vec![Node::text("a")]);
        assert_eq!(inline.children[1], Node::text("b"));
    }

    #[test]
    fn self_contained_tokens_become_atomic_elements() {
        let tokens = vec![Token::new("fence", "code", 0)
            .with_info("rust")
            .with_content("fn main() {}\n")];
        let tree = tokens_to_tree(&tokens).unwrap();
        let fence = &tree.children[0];
        assert_eq!(fence.name, "fence");
        assert_eq!(fence.children, vec![Node::text("fn main() {}\n")]);
    }

    #[test]
    fn images_keep_alt_inlines_as_children() {
        let tokens = vec![inline(vec![Token::new("image", "img", 0)
            .with_attr("src", "cat.png")
            .with_children(vec![text("a cat")])])];
        let tree = tokens_to_tree(&tokens).unwrap();
        let image = &tree.children[0].children[0];
        assert_eq!(image.name, "image");
        assert_eq!(image.collect_text(), "a cat");
    }

    #[test]
    fn close_without_open_is_unbalanced() {
        let err = tokens_to_tree(&[close("paragraph_close", "p")]).unwrap_err();
        assert!(matches!(err, Error::UnbalancedTree(_)));
    }

    #[test]
    fn mismatched_close_is_unbalanced() {
        let tokens = vec![open("paragraph_open", "p"), close("heading_close", "h1")];
        let err = tokens_to_tree(&tokens).unwrap_err();
        assert_eq!(
            err,
            Error::UnbalancedTree(
                "expected close for 'paragraph_open', found 'heading_close'".to_string()
            )
        );
    }

    #[test]
    fn unclosed_open_is_unbalanced() {
        let tokens = vec![open("blockquote_open", "blockquote"), open("paragraph_open", "p")];
        let err = tokens_to_tree(&tokens).unwrap_err();
        assert!(matches!(err, Error::UnbalancedTree(msg) if msg.contains("paragraph_open")));
    }

    #[test]
    fn unbalanced_inline_children_are_reported() {
        let tokens = vec![inline(vec![open("strong_open", "strong"), text("x")])];
        assert!(tokens_to_tree(&tokens).is_err());
    }
}
