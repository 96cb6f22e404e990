//! Generated checks for attachment and namespace declaration order.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use proptest::sample::Index;

use xmlwright::{BuildError, Document, DocumentOptions, NodeId};

fn bare() -> Document {
    Document::with_options(&DocumentOptions::default().declaration(false)).unwrap()
}

/// Creates a detached node: 0 for an element, 1 for text, anything else for
/// a comment.
fn detached(doc: &mut Document, kind: u8) -> NodeId {
    match kind {
        0 => doc.create_element("x").unwrap(),
        1 => doc.create_text("t"),
        _ => doc.create_comment("c"),
    }
}

proptest! {
    #[test]
    fn prop_nodes_attach_once(
        kinds in prop::collection::vec(0..3_u8, 1..8),
        attempts in prop::collection::vec((any::<Index>(), 0..4_usize), 1..40),
    ) {
        let mut doc = bare();
        let root = doc.root();
        let mut parents = vec![root];
        for name in ["a", "b", "c"] {
            parents.push(doc.add_element(root, name).unwrap());
        }
        let nodes: Vec<NodeId> = kinds.iter().map(|&kind| detached(&mut doc, kind)).collect();
        let mut owners: Vec<Option<NodeId>> = vec![None; nodes.len()];

        for (pick, slot) in attempts {
            let i = pick.index(nodes.len());
            let parent = parents[slot];
            let result = doc.add_child(parent, nodes[i]);
            match owners[i] {
                None => {
                    prop_assert_eq!(result, Ok(()));
                    owners[i] = Some(parent);
                }
                Some(owner) if owner == parent => {
                    prop_assert!(
                        matches!(result, Err(BuildError::AlreadyAdded { .. })),
                        "re-adding to the same parent gave {:?}",
                        result
                    );
                }
                Some(_) => {
                    prop_assert!(
                        matches!(result, Err(BuildError::AlreadyAttached { .. })),
                        "adding to a second parent gave {:?}",
                        result
                    );
                }
            }
            prop_assert_eq!(doc.parent(nodes[i]), owners[i]);
        }

        for (node, owner) in nodes.iter().zip(&owners) {
            let mut listings = Vec::new();
            for &parent in &parents {
                let count = doc.children(parent).iter().filter(|&child| child == node).count();
                listings.extend(std::iter::repeat(parent).take(count));
            }
            prop_assert_eq!(listings, owner.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn prop_namespaces_sort_default_first(
        prefixes in prop::collection::btree_set("[a-w][a-z0-9]{0,6}", 0..10)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        with_default in any::<bool>(),
    ) {
        let mut doc = bare();
        let root = doc.root();
        let mut declared = Vec::new();
        for prefix in &prefixes {
            declared.push(doc.namespace(&format!("urn:{prefix}"), Some(prefix.as_str())).unwrap());
        }
        if with_default {
            declared.push(doc.namespace("urn:default", None).unwrap());
        }

        for ns in &declared {
            prop_assert!(doc.set_namespace(root, ns.clone()).unwrap());
        }
        for ns in &declared {
            prop_assert!(!doc.set_namespace(root, ns.clone()).unwrap());
        }

        let listed = doc.namespaces(root);
        prop_assert_eq!(listed.len(), declared.len());
        if with_default {
            prop_assert_eq!(listed[0].prefix(), None);
        }
        let listed_prefixes: Vec<&str> = listed.iter().filter_map(|ns| ns.prefix()).collect();
        let mut sorted = prefixes.clone();
        sorted.sort();
        prop_assert_eq!(listed_prefixes, sorted.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
