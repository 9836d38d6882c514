//! Markdown parsing (Markdown → node tree)
//!
//! Pipeline: Markdown string → Comrak AST → markdown-it shaped node tree.
//!
//! Element names and token fields follow markdown-it, so a tree built here
//! converts exactly like one rebuilt from a markdown-it token dump by the
//! `tokens` format.

use super::MarkdownOptions;
use crate::error::FormatError;
use crate::tree::{Node, Token};
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse a Markdown string into a `root` node.
pub fn parse_from_markdown(source: &str, options: &MarkdownOptions) -> Result<Node, FormatError> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &comrak_options(options));

    let mut children = Vec::new();
    for child in root.children() {
        collect_block(child, false, &mut children);
    }
    log::debug!("markdown produced {} top-level blocks", children.len());
    Ok(Node::root(children))
}

fn comrak_options(options: &MarkdownOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.table;
    comrak.extension.strikethrough = options.strikethrough;
    comrak.extension.autolink = options.autolink;
    comrak.extension.tasklist = options.tasklist;
    comrak.extension.front_matter_delimiter = Some("---".to_string());
    comrak
}

/// Convert one block node. `tight` is set for the direct children of items in
/// a tight list, whose paragraphs markdown-it marks hidden.
fn collect_block<'a>(node: &'a AstNode<'a>, tight: bool, out: &mut Vec<Node>) {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Document => {
            for child in node.children() {
                collect_block(child, false, out);
            }
        }

        NodeValue::Heading(heading) => {
            let tag = format!("h{}", heading.level);
            let markup = match (heading.setext, heading.level) {
                (true, 1) => "=".to_string(),
                (true, _) => "-".to_string(),
                (false, level) => "#".repeat(level as usize),
            };
            out.push(container(
                Token::new("heading_open", &tag, 1).with_markup(&markup),
                Token::new("heading_close", &tag, -1).with_markup(&markup),
                vec![Node::inline(inlines(node))],
            ));
        }

        NodeValue::Paragraph => {
            out.push(container(
                Token::new("paragraph_open", "p", 1).hidden(tight),
                Token::new("paragraph_close", "p", -1).hidden(tight),
                vec![Node::inline(inlines(node))],
            ));
        }

        NodeValue::List(list) => {
            let (kind, tag) = match list.list_type {
                ListType::Bullet => ("bullet_list", "ul"),
                ListType::Ordered => ("ordered_list", "ol"),
            };
            let mut open = Token::new(format!("{kind}_open"), tag, 1);
            if matches!(list.list_type, ListType::Ordered) && list.start != 1 {
                open = open.with_attr("start", list.start.to_string());
            }
            let mut items = Vec::new();
            for child in node.children() {
                collect_item(child, list.tight, &mut items);
            }
            out.push(container(open, Token::new(format!("{kind}_close"), tag, -1), items));
        }

        NodeValue::Item(_) | NodeValue::TaskItem(_) => {
            // Items outside a list do not occur in comrak output.
            collect_item(node, tight, out);
        }

        NodeValue::BlockQuote => {
            let mut children = Vec::new();
            for child in node.children() {
                collect_block(child, false, &mut children);
            }
            out.push(container(
                Token::new("blockquote_open", "blockquote", 1).with_markup(">"),
                Token::new("blockquote_close", "blockquote", -1).with_markup(">"),
                children,
            ));
        }

        NodeValue::CodeBlock(code) => {
            let token = if code.fenced {
                let fence = (code.fence_char as char).to_string().repeat(code.fence_length);
                // comrak hands the info string over already entity-decoded;
                // re-escape `&` so it reads like raw markdown-it info.
                Token::new("fence", "code", 0)
                    .with_info(code.info.replace('&', "&amp;"))
                    .with_markup(&fence)
            } else {
                Token::new("code_block", "code", 0)
            };
            out.push(Node::atomic(
                token.with_content(code.literal.clone()).block(true),
            ));
        }

        NodeValue::HtmlBlock(html) => {
            out.push(Node::atomic(
                Token::new("html_block", "", 0)
                    .with_content(html.literal.clone())
                    .block(true),
            ));
        }

        NodeValue::ThematicBreak => {
            out.push(Node::atomic(
                Token::new("hr", "hr", 0).with_markup("---").block(true),
            ));
        }

        NodeValue::Table(table) => {
            let alignments = table.alignments.clone();
            let mut rows = Vec::new();
            for row in node.children() {
                collect_row(row, &alignments, &mut rows);
            }
            out.push(container(
                Token::new("table_open", "table", 1),
                Token::new("table_close", "table", -1),
                rows,
            ));
        }

        NodeValue::FrontMatter(_) => {
            log::trace!("skipping front matter");
        }

        other => {
            log::trace!("flattening unsupported block {other:?}");
            for child in node.children() {
                collect_block(child, tight, out);
            }
        }
    }
}

fn collect_item<'a>(node: &'a AstNode<'a>, tight: bool, out: &mut Vec<Node>) {
    let item = match &node.data.borrow().value {
        NodeValue::Item(item) => Some((item_markup(item), None)),
        NodeValue::TaskItem(symbol) => Some(("-".to_string(), Some(symbol.is_some()))),
        _ => None,
    };
    let Some((markup, checked)) = item else {
        collect_block(node, tight, out);
        return;
    };

    let mut open = Token::new("list_item_open", "li", 1).with_markup(&markup);
    if let Some(checked) = checked {
        open = open.with_attr("checked", checked.to_string());
    }
    let mut children = Vec::new();
    for child in node.children() {
        collect_block(child, tight, &mut children);
    }
    out.push(container(
        open,
        Token::new("list_item_close", "li", -1).with_markup(&markup),
        children,
    ));
}

fn item_markup(item: &NodeList) -> String {
    match (item.list_type, item.delimiter) {
        (ListType::Bullet, _) => (item.bullet_char as char).to_string(),
        (ListType::Ordered, ListDelimType::Period) => ".".to_string(),
        (ListType::Ordered, ListDelimType::Paren) => ")".to_string(),
    }
}

fn collect_row<'a>(node: &'a AstNode<'a>, alignments: &[TableAlignment], out: &mut Vec<Node>) {
    let header = matches!(node.data.borrow().value, NodeValue::TableRow(true));
    let tag = if header { "th" } else { "td" };

    let cells = node
        .children()
        .enumerate()
        .map(|(column, cell)| {
            let mut open = Token::new(format!("{tag}_open"), tag, 1);
            if let Some(style) = alignments.get(column).and_then(alignment_style) {
                open = open.with_attr("style", style);
            }
            container(
                open,
                Token::new(format!("{tag}_close"), tag, -1),
                vec![Node::inline(inlines(cell))],
            )
        })
        .collect();

    out.push(container(
        Token::new("tr_open", "tr", 1),
        Token::new("tr_close", "tr", -1),
        cells,
    ));
}

fn alignment_style(alignment: &TableAlignment) -> Option<&'static str> {
    match alignment {
        TableAlignment::Left => Some("text-align:left"),
        TableAlignment::Right => Some("text-align:right"),
        TableAlignment::Center => Some("text-align:center"),
        TableAlignment::None => None,
    }
}

/// The inline children of `node`.
fn inlines<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let mut out = Vec::new();
    for child in node.children() {
        collect_inline(child, &mut out);
    }
    out
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Node>) {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Text(text) => out.push(Node::text(text.clone())),

        NodeValue::SoftBreak => out.push(Node::softbreak()),

        NodeValue::LineBreak => out.push(Node::atomic(Token::new("hardbreak", "br", 0))),

        NodeValue::Emph => out.push(wrap(node, "em", "em", "*")),

        NodeValue::Strong => out.push(wrap(node, "strong", "strong", "**")),

        NodeValue::Strikethrough => out.push(wrap(node, "s", "s", "~~")),

        NodeValue::Code(code) => out.push(Node::atomic(
            Token::new("code_inline", "code", 0)
                .with_content(code.literal.clone())
                .with_markup(&"`".repeat(code.num_backticks)),
        )),

        NodeValue::HtmlInline(html) => out.push(Node::atomic(
            Token::new("html_inline", "", 0).with_content(html.clone()),
        )),

        NodeValue::Link(link) => {
            let mut open = Token::new("link_open", "a", 1).with_attr("href", link.url.clone());
            if !link.title.is_empty() {
                open = open.with_attr("title", link.title.clone());
            }
            out.push(container(open, Token::new("link_close", "a", -1), inlines(node)));
        }

        NodeValue::Image(link) => {
            let mut token = Token::new("image", "img", 0).with_attr("src", link.url.clone());
            if !link.title.is_empty() {
                token = token.with_attr("title", link.title.clone());
            }
            out.push(Node {
                name: token.element_name().to_string(),
                open: Some(token.clone()),
                close: Some(token),
                value: None,
                children: inlines(node),
            });
        }

        other => {
            log::trace!("flattening unsupported inline {other:?}");
            for child in node.children() {
                collect_inline(child, out);
            }
        }
    }
}

fn wrap<'a>(node: &'a AstNode<'a>, name: &str, tag: &str, markup: &str) -> Node {
    container(
        Token::new(format!("{name}_open"), tag, 1).with_markup(markup),
        Token::new(format!("{name}_close"), tag, -1).with_markup(markup),
        inlines(node),
    )
}

fn container(open: Token, close: Token, children: Vec<Node>) -> Node {
    Node::container(open, Some(close), children)
}
