//! Pipeline stages working together on hand-built trees.

use crate::common::render;
use docspan::tree::{Node, Token};
use docspan::{
    Annotation, Attributes, Converter, Document, DropAligned, HandlerError, Pipeline, Value,
    VocabularyMap,
};

fn link(href: &str, children: Vec<Node>) -> Node {
    Node::container(
        Token::new("link_open", "a", 1).with_attr("href", href),
        Some(Token::new("link_close", "a", -1)),
        children,
    )
}

fn paragraph(children: Vec<Node>) -> Node {
    Node::container(
        Token::new("paragraph_open", "p", 1),
        Some(Token::new("paragraph_close", "p", -1)),
        children,
    )
}

fn underline(text: &str) -> Node {
    Node::element("underline", vec![Node::text(text)])
}

#[test]
fn underline_shadowing_a_link_is_dropped() {
    let tree = Node::root(vec![paragraph(vec![
        Node::text("see "),
        link("https://a.example", vec![underline("here")]),
        Node::text(" and "),
        underline("there"),
    ])]);
    let doc = Pipeline::default()
        .with_remap(VocabularyMap::commonmark())
        .with_cleanup(DropAligned::new("underline", "link"))
        .run(&tree)
        .unwrap();
    insta::assert_snapshot!(render(&doc), @r#"
    link 4..8 url="https://a.example" "here"
    underline 13..18 "there"
    paragraph 0..18 "see here and there"
    "#);
}

#[test]
fn partially_covering_underline_survives() {
    let tree = Node::root(vec![link(
        "/x",
        vec![underline("ab"), Node::text("c")],
    )]);
    let doc = Pipeline::default()
        .with_cleanup(DropAligned::new("underline", "link"))
        .run(&tree)
        .unwrap();
    assert_eq!(doc.select(|a| a.kind == "underline").len(), 1);
}

#[test]
fn custom_handlers_run_inside_the_pipeline() {
    let converter = Converter::new().with_handler(
        "link",
        |open: Option<&Token>| -> Result<Attributes, HandlerError> {
            let href = open.and_then(|t| t.attr("href")).unwrap_or_default();
            let mut patch = Attributes::new();
            patch.insert("external".to_string(), Value::Bool(href.starts_with("http")));
            Ok(patch)
        },
    );
    let tree = Node::root(vec![
        link("https://a.example", vec![Node::text("a")]),
        link("/b", vec![Node::text("b")]),
    ]);
    let doc = Pipeline::new(converter).run(&tree).unwrap();
    let flags: Vec<_> = doc
        .annotations()
        .iter()
        .map(|a| a.attribute("external").cloned())
        .collect();
    assert_eq!(flags, vec![Some(Value::Bool(true)), Some(Value::Bool(false))]);
}

#[test]
fn drop_unmapped_keeps_only_known_types() {
    let tree = Node::root(vec![paragraph(vec![underline("u")])]);
    let doc = Pipeline::default()
        .with_remap(VocabularyMap::commonmark().drop_unmapped(true))
        .run(&tree)
        .unwrap();
    assert_eq!(render(&doc), "paragraph 0..1 \"u\"");
}

#[test]
fn queries_span_documents() {
    let first = Pipeline::default()
        .run(&Node::root(vec![link("/a", vec![Node::text("a")])]))
        .unwrap();
    let second = Pipeline::default()
        .run(&Node::root(vec![underline("b")]))
        .unwrap();
    let all = first.all().union(second.all());
    let aligned = all.join(&all, |a, b| a.kind != b.kind && a.is_aligned_with(b));
    assert_eq!(aligned.len(), 2);
}

#[test]
fn edits_after_conversion_shift_annotations() {
    let mut doc: Document = Pipeline::default()
        .run(&Node::root(vec![paragraph(vec![Node::text("world")])]))
        .unwrap();
    doc.insert_text(0, "hello ").unwrap();
    doc.add_annotation(Annotation::new("greeting", 0, 5)).unwrap();
    insta::assert_snapshot!(render(&doc), @r#"
    paragraph 6..11 "world"
    greeting 0..5 "hello"
    "#);
}
