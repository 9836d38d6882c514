//! Attributes known only once an element's subtree is complete.

use crate::document::{Attributes, Value};
use crate::tree::{Node, Token};

use super::entities::decode_entities;

/// Flat projection of the open token's `attrs`.
pub(crate) fn base(open: Option<&Token>) -> Attributes {
    open.map(|token| {
        token
            .attrs
            .iter()
            .map(|(key, value)| (key.clone(), Value::Str(value.clone())))
            .collect()
    })
    .unwrap_or_default()
}

/// `h2` -> 2. Tags without digits yield nothing.
pub(crate) fn heading_level(open: Option<&Token>) -> Option<i64> {
    let digits: String = open?.tag.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The decoded info string of a fenced block.
pub(crate) fn info_string(open: Option<&Token>) -> Option<String> {
    let info = open?.info.trim();
    if info.is_empty() {
        return None;
    }
    Some(decode_entities(info).into_owned())
}

/// A list is tight when any of its items holds a hidden paragraph.
pub(crate) fn is_tight(list: &Node) -> bool {
    list.children
        .iter()
        .filter(|item| item.name == "list_item")
        .flat_map(|item| item.children.iter())
        .any(|child| child.name == "paragraph" && child.open.as_ref().is_some_and(|t| t.hidden))
}

/// Attributes every element gets before any custom handler runs.
pub(crate) fn computed(node: &Node, opaque: bool) -> Attributes {
    let open = node.open.as_ref();
    let mut attributes = base(open);

    if node.name == "heading" {
        if let Some(level) = heading_level(open) {
            attributes.insert("level".to_string(), Value::Int(level));
        }
    }
    if let Some(info) = info_string(open) {
        attributes.insert("info".to_string(), Value::Str(info));
    }
    if node.name.ends_with("_list") {
        attributes.insert("tight".to_string(), Value::Bool(is_tight(node)));
    }
    if opaque {
        attributes.insert("alt".to_string(), Value::Str(node.collect_text()));
    }
    attributes
}
