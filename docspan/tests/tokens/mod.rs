//! markdown-it token dumps through the full pipeline.

use crate::common::render;
use docspan::format::Format;
use docspan::formats::{MarkdownFormat, TokensFormat};
use docspan::{Error, FormatError, Pipeline, Value, VocabularyMap};

/// `md.parse("- a\n- b\n", {})`, trimmed to the fields the converter reads.
const TIGHT_LIST: &str = r#"[
    {"type": "bullet_list_open", "tag": "ul", "nesting": 1, "markup": "-", "block": true},
    {"type": "list_item_open", "tag": "li", "nesting": 1, "markup": "-", "block": true},
    {"type": "paragraph_open", "tag": "p", "nesting": 1, "block": true, "hidden": true},
    {"type": "inline", "nesting": 0, "content": "a", "block": true, "children": [
        {"type": "text", "nesting": 0, "content": "a"}
    ]},
    {"type": "paragraph_close", "tag": "p", "nesting": -1, "block": true, "hidden": true},
    {"type": "list_item_close", "tag": "li", "nesting": -1, "markup": "-", "block": true},
    {"type": "list_item_open", "tag": "li", "nesting": 1, "markup": "-", "block": true},
    {"type": "paragraph_open", "tag": "p", "nesting": 1, "block": true, "hidden": true},
    {"type": "inline", "nesting": 0, "content": "b", "block": true, "children": [
        {"type": "text", "nesting": 0, "content": "b"}
    ]},
    {"type": "paragraph_close", "tag": "p", "nesting": -1, "block": true, "hidden": true},
    {"type": "list_item_close", "tag": "li", "nesting": -1, "markup": "-", "block": true},
    {"type": "bullet_list_close", "tag": "ul", "nesting": -1, "markup": "-", "block": true}
]"#;

fn pipeline() -> Pipeline {
    Pipeline::default().with_remap(VocabularyMap::commonmark())
}

#[test]
fn test_tight_list_from_tokens() {
    let doc = pipeline().run_source(&TokensFormat, TIGHT_LIST).unwrap();
    insta::assert_snapshot!(render(&doc), @r#"
    paragraph 0..1 "a"
    list-item 0..1 "a"
    paragraph 1..2 "b"
    list-item 1..2 "b"
    list 0..2 tight=true type="bulleted" "ab"
    "#);
}

#[test]
fn test_tokens_and_markdown_agree() {
    let from_tokens = pipeline().run_source(&TokensFormat, TIGHT_LIST).unwrap();
    let from_markdown = pipeline()
        .run_source(&MarkdownFormat::default(), "- a\n- b\n")
        .unwrap();
    assert_eq!(from_tokens, from_markdown);
}

#[test]
fn test_raw_tight_flag() {
    let doc = Pipeline::default()
        .raw()
        .run_source(&TokensFormat, TIGHT_LIST)
        .unwrap();
    let list = doc
        .select(|a| a.kind == "bullet_list")
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(list.attribute("tight"), Some(&Value::Bool(true)));
    assert_eq!(list.range(), 0..doc.len());
}

#[test]
fn test_fence_info_entities_are_decoded() {
    let json = r#"[
        {"type": "fence", "tag": "code", "nesting": 0, "info": "c&#43;&#43;",
         "content": "int x;\n", "markup": "```", "block": true}
    ]"#;
    let doc = TokensFormat.parse(json).and_then(|tree| Ok(pipeline().run(&tree)?)).unwrap();
    assert_eq!(render(&doc), "code-block 0..7 info=\"c++\" \"int x;\\n\"");
}

#[test]
fn test_mismatched_close_is_rejected() {
    let json = r#"[
        {"type": "em_open", "tag": "em", "nesting": 1},
        {"type": "strong_close", "tag": "strong", "nesting": -1}
    ]"#;
    match pipeline().run_source(&TokensFormat, json) {
        Err(FormatError::Conversion(Error::UnbalancedTree(message))) => {
            assert!(message.contains("em_open"), "{message}");
        }
        other => panic!("expected an unbalanced tree, got {other:?}"),
    }
}

#[test]
fn test_deeply_nested_stream_converts_and_drops() {
    const DEPTH: usize = 50_000;
    let open = r#"{"type": "blockquote_open", "tag": "blockquote", "nesting": 1}"#;
    let close = r#"{"type": "blockquote_close", "tag": "blockquote", "nesting": -1}"#;
    let mut tokens = vec![open; DEPTH];
    tokens.push(r#"{"type": "text", "content": "deep"}"#);
    tokens.extend(std::iter::repeat(close).take(DEPTH));
    let json = format!("[{}]", tokens.join(","));

    let doc = pipeline().run_source(&TokensFormat, &json).unwrap();
    assert_eq!(doc.content(), "deep");
    assert_eq!(doc.annotations().len(), DEPTH);
    assert!(doc.annotations().iter().all(|a| a.range() == (0..4)));
}
