//! Shared helpers for integration tests.

use docspan::tree::Node;
use docspan::Document;
use proptest::prelude::*;

/// One line per annotation: `<type> <start>..<end> <attrs> "<covered text>"`.
pub fn render(doc: &Document) -> String {
    doc.annotations()
        .iter()
        .map(|a| format!("{a} {:?}", doc.text_of(a)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of nodes in `root` that become annotations.
pub fn element_count(root: &Node) -> usize {
    let own = usize::from(root.kind() == docspan::tree::NodeKind::Element);
    own + root.children.iter().map(element_count).sum::<usize>()
}

const NAMES: &[&str] = &["em", "strong", "paragraph", "heading", "link", "underline"];

/// Random trees of elements, transparent wrappers, text and soft breaks.
pub fn arb_tree() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        4 => "[a-z ]{0,4}".prop_map(Node::text),
        1 => Just(Node::softbreak()),
    ];
    leaf.prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            3 => (prop::sample::select(NAMES), prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(name, children)| Node::element(name, children)),
            1 => prop::collection::vec(inner, 0..4).prop_map(Node::inline),
        ]
    })
    .prop_map(|node| Node::root(vec![node]))
}
