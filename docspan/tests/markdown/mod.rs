//! Markdown import through the full pipeline.

use crate::common::render;
use docspan::format::Format;
use docspan::formats::{MarkdownFormat, MarkdownOptions, TokensFormat};
use docspan::{Document, Pipeline, Value, VocabularyMap};
use insta::assert_snapshot;

fn md(source: &str) -> Document {
    Pipeline::default()
        .with_remap(VocabularyMap::commonmark())
        .run_source(&MarkdownFormat::default(), source)
        .expect("markdown converts")
}

#[test]
fn test_heading_with_emphasis() {
    assert_snapshot!(render(&md("## Hello *world*\n")), @r#"
    italic 6..11 "world"
    heading 0..11 level=2 "Hello world"
    "#);
}

#[test]
fn test_tight_list() {
    assert_snapshot!(render(&md("- a\n- b\n")), @r#"
    paragraph 0..1 "a"
    list-item 0..1 "a"
    paragraph 1..2 "b"
    list-item 1..2 "b"
    list 0..2 tight=true type="bulleted" "ab"
    "#);
}

#[test]
fn test_loose_list_is_not_tight() {
    let doc = md("1. a\n\n2. b\n");
    let list = doc.select(|a| a.kind == "list").into_iter().next().unwrap();
    assert_eq!(list.attribute("tight"), Some(&Value::Bool(false)));
    assert_eq!(list.attribute("type").and_then(Value::as_str), Some("numbered"));
}

#[test]
fn test_link_attributes_are_renamed() {
    assert_snapshot!(render(&md("go [site](https://x.example \"T\")\n")), @r#"
    link 3..7 title="T" url="https://x.example" "site"
    paragraph 0..7 "go site"
    "#);
}

#[test]
fn test_fence_keeps_decoded_info() {
    let doc = md("```rust\nlet x = 1;\n```\n");
    assert_eq!(doc.content(), "let x = 1;\n");
    assert_snapshot!(render(&doc), @r#"code-block 0..11 info="rust" "let x = 1;\n""#);
}

#[test]
fn test_fence_info_is_decoded_exactly_once() {
    let doc = md("```a&amp;lt;b\nx\n```\n");
    let block = &doc.annotations()[0];
    assert_eq!(block.attribute("info").and_then(Value::as_str), Some("a&lt;b"));

    let tokens = r#"[{"type": "fence", "tag": "code", "nesting": 0, "info": "a&amp;lt;b",
        "content": "x\n", "markup": "```", "block": true}]"#;
    let from_tokens = Pipeline::default()
        .with_remap(VocabularyMap::commonmark())
        .run_source(&TokensFormat, tokens)
        .expect("tokens convert");
    assert_eq!(from_tokens, doc);
}

#[test]
fn test_image_collapses_to_a_point() {
    assert_snapshot!(render(&md("see ![a cat](cat.png)\n")), @r#"
    image 4..4 description="a cat" url="cat.png" ""
    paragraph 0..4 "see "
    "#);
}

#[test]
fn test_code_span_with_edge_backtick_is_padded() {
    let doc = md("`` `x` ``\n");
    assert_eq!(doc.content(), " `x` ");
    let code = doc.select(|a| a.kind == "code").into_iter().next().unwrap();
    assert_eq!(code.range(), 0..5);
}

#[test]
fn test_soft_breaks_become_newlines() {
    let doc = md("one\ntwo\n");
    assert_eq!(doc.content(), "one\ntwo");
}

#[test]
fn test_raw_output_brackets_every_element() {
    let doc = Pipeline::default()
        .raw()
        .run_source(&MarkdownFormat::default(), "*a*\n")
        .unwrap();
    assert_eq!(doc.content(), "\u{FFFC}\u{FFFC}a\u{FFFC}\u{FFFC}");
    let markers: Vec<_> = doc
        .annotations()
        .iter()
        .filter(|a| a.is_parse_token())
        .map(|a| a.attribute("type").and_then(Value::as_str).unwrap().to_string())
        .collect();
    assert_eq!(
        markers,
        vec!["paragraph_open", "em_open", "em_close", "paragraph_close"]
    );
}

#[test]
fn test_strikethrough_extension_can_be_disabled() {
    let format = MarkdownFormat::new(MarkdownOptions {
        strikethrough: false,
        ..MarkdownOptions::default()
    });
    let doc = Pipeline::default().run_source(&format, "~~x~~\n").unwrap();
    assert_eq!(doc.content(), "~~x~~");
    assert!(doc.select(|a| a.kind == "s").is_empty());
}
