//! Properties that hold for every converted tree.

use crate::common::{arb_tree, element_count};
use docspan::{join, remap_document, Annotation, Converter, Identity, PLACEHOLDER};
use proptest::prelude::*;

proptest! {
    #[test]
    fn boundaries_stay_inside_the_buffer(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        for a in doc.annotations() {
            prop_assert!(a.start <= a.end && a.end <= doc.len(), "{a} outside {}", doc.len());
        }
    }

    #[test]
    fn markers_sit_on_placeholders(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        for marker in doc.annotations().iter().filter(|a| a.is_parse_token()) {
            prop_assert_eq!(marker.len(), 1);
            prop_assert_eq!(doc.text_of(marker), PLACEHOLDER);
        }
    }

    #[test]
    fn every_element_yields_one_annotation_and_two_markers(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        let elements = element_count(&tree);
        let markers = doc.annotations().iter().filter(|a| a.is_parse_token()).count();
        prop_assert_eq!(markers, 2 * elements);
        prop_assert_eq!(doc.annotations().len() - markers, elements);
    }

    #[test]
    fn element_spans_nest_or_are_disjoint(tree in arb_tree()) {
        let raw = Converter::new().convert(&tree).unwrap();
        for doc in [raw.clone(), raw.canonical()] {
            let spans: Vec<_> = doc.select(|a| !a.is_parse_token()).into_iter().collect();
            for a in &spans {
                for b in &spans {
                    prop_assert!(
                        a.end <= b.start || b.end <= a.start || a.contains(b) || b.contains(a),
                        "{a} and {b} overlap"
                    );
                }
            }
        }
    }

    #[test]
    fn raw_elements_never_align(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        let spans = doc.select(|a| !a.is_parse_token());
        let aligned = spans.join(&spans, |a, b| a.id() != b.id() && a.is_aligned_with(b));
        prop_assert!(aligned.is_empty());
    }

    #[test]
    fn canonical_drops_exactly_the_placeholders(tree in arb_tree()) {
        let raw = Converter::new().convert(&tree).unwrap();
        let canonical = raw.canonical();
        prop_assert!(!canonical.content().contains(PLACEHOLDER));
        prop_assert_eq!(canonical.len(), raw.len() - 2 * element_count(&tree));
        prop_assert!(canonical.annotations().iter().all(|a| !a.is_parse_token()));
    }

    #[test]
    fn alignment_is_symmetric(
        a in (0usize..6, 0usize..6),
        b in (0usize..6, 0usize..6),
    ) {
        let a = Annotation::new("a", a.0.min(a.1), a.0.max(a.1));
        let b = Annotation::new("b", b.0.min(b.1), b.0.max(b.1));
        prop_assert_eq!(a.is_aligned_with(&b), b.is_aligned_with(&a));
    }

    #[test]
    fn join_returns_every_matching_pair(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        let left = doc.select(|a| a.kind == "em" || a.kind == "strong");
        let right = doc.select(|a| !a.is_parse_token());
        let joined = join(&left, &right, Annotation::contains);

        let mut expected = 0;
        for a in left.iter() {
            for b in right.iter() {
                if a.contains(b) {
                    expected += 1;
                }
            }
        }
        prop_assert_eq!(joined.len(), expected);
        prop_assert!(joined.pairs().iter().all(|(a, b)| a.contains(b)));
    }

    #[test]
    fn identity_remap_changes_nothing(tree in arb_tree()) {
        let doc = Converter::new().convert(&tree).unwrap();
        prop_assert_eq!(remap_document(&doc, &Identity).unwrap(), doc);
    }
}
