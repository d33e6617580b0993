//! Property tests for layout, estimation and export

use std::collections::HashSet;

use procxd::core::{estimate_text_size, FontFamily};
use procxd::layout::TreeLayoutResult;
use procxd::prelude::*;
use proptest::prelude::*;

fn arb_tree() -> impl Strategy<Value = LabelTree> {
    let leaf = "[a-z]{1,12}".prop_map(LabelTree::leaf);
    leaf.prop_recursive(4, 40, 5, |inner| {
        ("[a-z ]{1,20}", prop::collection::vec(inner, 0..5))
            .prop_map(|(label, children)| LabelTree::new(label, children))
    })
}

/// Root labels far wider than the row of short leaves under them
fn arb_wide_parent_tree() -> impl Strategy<Value = LabelTree> {
    (
        "[a-z ]{30,60}",
        prop::collection::vec("[a-z]{1,3}", 1..4),
        prop::collection::vec("[a-z]{1,25}", 0..3),
    )
        .prop_map(|(root, short, mixed)| {
            let children = short
                .into_iter()
                .chain(mixed)
                .map(LabelTree::leaf)
                .collect();
            LabelTree::new(root, children)
        })
}

fn assert_parents_over_mean(layout: &TreeLayoutResult) -> std::result::Result<(), TestCaseError> {
    for node in &layout.nodes {
        let children: Vec<_> = layout.children_of(node.index).collect();
        if children.is_empty() {
            continue;
        }
        let mean = children.iter().map(|c| c.x).sum::<f64>() / children.len() as f64;
        prop_assert!(
            (node.x - mean).abs() < 1e-6,
            "{} at {} but children mean {}",
            node.label,
            node.x,
            mean
        );
    }
    Ok(())
}

fn arb_family() -> impl Strategy<Value = FontFamily> {
    prop_oneof![
        Just(FontFamily::HandDrawn),
        Just(FontFamily::Normal),
        Just(FontFamily::Code),
    ]
}

proptest! {
    #[test]
    fn sibling_subtrees_never_overlap(tree in arb_tree()) {
        let layout = TreeLayoutAlgorithm::new().layout(&tree).unwrap();
        for node in &layout.nodes {
            let children: Vec<_> = layout.children_of(node.index).collect();
            for pair in children.windows(2) {
                prop_assert!(pair[0].span_right <= pair[1].span_left + 1e-9);
            }
            let bounds = node.bounds();
            prop_assert!(bounds.min_x() >= node.span_left - 1e-9);
            prop_assert!(bounds.max_x() <= node.span_right + 1e-9);
        }
    }

    #[test]
    fn parents_sit_over_children_mean(tree in arb_tree()) {
        let layout = TreeLayoutAlgorithm::new().layout(&tree).unwrap();
        assert_parents_over_mean(&layout)?;
    }

    #[test]
    fn wide_parents_sit_over_children_mean(tree in arb_wide_parent_tree()) {
        let layout = TreeLayoutAlgorithm::new().layout(&tree).unwrap();
        assert_parents_over_mean(&layout)?;
        let root = &layout.nodes[0];
        prop_assert!(root.bounds().min_x() >= root.span_left - 1e-9);
        prop_assert!(root.bounds().max_x() <= root.span_right + 1e-9);
        let children: Vec<_> = layout.children_of(0).collect();
        for pair in children.windows(2) {
            prop_assert!(pair[0].span_right <= pair[1].span_left + 1e-9);
        }
    }

    #[test]
    fn estimate_is_positive_and_monotone(
        text in "[a-zA-Z0-9 ]{0,40}",
        extra in "[a-zA-Z0-9 ]{0,10}",
        size in 1.0f64..96.0,
        bump in 0.0f64..20.0,
        family in arb_family(),
    ) {
        let base = estimate_text_size(&text, size, family);
        prop_assert!(base.width > 0.0 && base.height > 0.0);

        let longer = estimate_text_size(&format!("{}{}", text, extra), size, family);
        prop_assert!(longer.width >= base.width);
        prop_assert!(longer.height >= base.height);

        let bigger = estimate_text_size(&text, size + bump, family);
        prop_assert!(bigger.width >= base.width);
        prop_assert!(bigger.height >= base.height);
    }

    #[test]
    fn exported_references_resolve(tree in arb_tree(), seed in any::<u64>()) {
        let mut builder = SketchBuilder::with_config(SketchConfig::seeded(seed));
        render_tree(&mut builder, &tree, &TreeLayoutAlgorithm::new()).unwrap();

        let json = builder.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let elements = value["elements"].as_array().unwrap();
        prop_assert_eq!(elements.len(), builder.len());

        let ids: HashSet<&str> = elements.iter().filter_map(|e| e["id"].as_str()).collect();
        prop_assert_eq!(ids.len(), elements.len());
        for element in elements {
            for key in ["startBinding", "endBinding"] {
                if let Some(target) = element[key]["elementId"].as_str() {
                    prop_assert!(ids.contains(target));
                }
            }
            if let Some(container) = element["containerId"].as_str() {
                prop_assert!(ids.contains(container));
            }
            for bound in element["boundElements"].as_array().into_iter().flatten() {
                prop_assert!(ids.contains(bound["id"].as_str().unwrap_or_default()));
            }
        }
    }
}
