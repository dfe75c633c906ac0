//
// SPDX-License-Identifier: MIT
//

//! C5: Pruner — mark-and-prune the assembled tree to the minimal subtree
//! containing a set of matched nodes plus their full ancestry, per spec.md
//! §4.4.

use crate::debug::Debug;
use crate::xml::{XmlHandle, XmlTree};

/// The XPath evaluator is external to this crate (spec.md §1); this trait
/// is the query contract [`crate::facade::DatastoreFacade::get`] calls
/// against the tree it just assembled, so match handles are always
/// resolved against the same arena the pruner then mutates.
pub trait XPathEvaluator {
    fn evaluate(&self, tree: &XmlTree, xpath: &str) -> Vec<XmlHandle>;
}

/// Marks every node in `matches`, then removes every element that is
/// neither marked nor an ancestor of a marked element. `MARK` is cleared
/// on exit (I5) so `tree` stays reusable for a later read.
pub fn prune(tree: &mut XmlTree, matches: &[XmlHandle]) {
    Debug::Prune { matched: matches.len() }.log();

    for &handle in matches {
        tree.mark(handle);
    }

    let root = tree.root();
    retain_marked_or_ancestor(tree, root);

    tree.clear_marks();
}

/// Returns whether `node` survives: marked, or any child survives. A
/// marked node's own subtree is kept intact (it *is* a match, not merely on
/// the path to one); an unmarked node keeps only children that themselves
/// survive, so unrelated siblings are dropped.
fn retain_marked_or_ancestor(tree: &mut XmlTree, node: XmlHandle) -> bool {
    if tree.is_marked(node) {
        return true;
    }

    let children = tree.children(node).to_vec();
    let mut any_child_survives = false;
    for child in children {
        if !tree.is_element(child) {
            // Body text has no mark status of its own; it is kept or
            // dropped along with the element that owns it.
            continue;
        }
        if retain_marked_or_ancestor(tree, child) {
            any_child_survives = true;
        } else {
            tree.remove_child(node, child);
        }
    }
    any_child_survives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::integrate;
    use crate::schema::{container, leaf, list, module, YangSpec};

    #[test]
    fn prune_keeps_match_and_ancestry_drops_siblings() {
        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![
                container("a", vec![leaf("v")]),
                container("b", vec![leaf("v")]),
            ],
        )]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/a/v", Some("1")).unwrap();
        integrate(&mut tree, &spec, "/b/v", Some("2")).unwrap();

        let root = tree.root();
        let a = tree.find_element_child(root, "a").unwrap();
        prune(&mut tree, &[a]);

        assert!(tree.find_element_child(root, "a").is_some());
        assert!(tree.find_element_child(root, "b").is_none());
        assert!(!tree.is_marked(a));
    }

    #[test]
    fn prune_keeps_matched_list_entry_ancestry() {
        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![list("x", &["k1"], vec![leaf("k1"), leaf("v")])],
        )]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/x/1/k1", Some("1")).unwrap();
        integrate(&mut tree, &spec, "/x/1/v", Some("hi")).unwrap();
        integrate(&mut tree, &spec, "/x/2/k1", Some("2")).unwrap();
        integrate(&mut tree, &spec, "/x/2/v", Some("bye")).unwrap();

        let root = tree.root();
        let entry1 = tree.find_list_entry(root, "x", &[("k1", "1")]).unwrap();
        let v1 = tree.find_element_child(entry1, "v").unwrap();
        prune(&mut tree, &[v1]);

        assert!(tree.find_list_entry(root, "x", &[("k1", "1")]).is_some());
        assert!(tree.find_list_entry(root, "x", &[("k1", "2")]).is_none());
    }

    #[test]
    fn prune_clears_marks_on_exit() {
        let spec = YangSpec::from_modules(vec![module("m", vec![container("a", vec![])])]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/a", None).unwrap();
        let root = tree.root();
        let a = tree.find_element_child(root, "a").unwrap();

        prune(&mut tree, &[a]);
        assert!(!tree.is_marked(a));
        assert!(!tree.is_marked(root));
    }
}
