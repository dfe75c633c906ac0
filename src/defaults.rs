//
// SPDX-License-Identifier: MIT
//

//! C4: DefaultFiller / Sanity — schema default injection (P7) and I1
//! conformance checking, per spec.md §4.3.

use crate::debug::Debug;
use crate::error::{Error, Result};
use crate::schema::{Keyword, YangSpec, YangStmtHandle};
use crate::xml::{XmlHandle, XmlTree};

/// Walks the schema (not just the already-assembled elements) so that an
/// absent, non-presence container whose only content would be defaults is
/// still materialized — matching ordinary YANG validation behavior, where
/// a non-presence container is conceptually always there. `list` entries
/// are never auto-instantiated; only defaults within entries that already
/// exist in `tree` are filled.
pub fn fill(tree: &mut XmlTree, spec: &YangSpec) {
    let root = tree.root();
    for top in spec.tops().collect::<Vec<_>>() {
        fill_schema_driven(tree, spec, root, top);
    }
}

fn fill_schema_driven(
    tree: &mut XmlTree,
    spec: &YangSpec,
    parent: XmlHandle,
    schema: YangStmtHandle,
) {
    let node = spec.node(schema);
    match node.keyword() {
        Keyword::Leaf => {
            let Some(default) = node.default() else { return };
            // P7: a defaulted leaf is added only when absent; an explicit
            // value is never overwritten.
            if tree.find_element_child(parent, node.argument()).is_some() {
                return;
            }
            let leaf = tree.add_element(parent, node.argument(), Some(schema));
            tree.set_body(leaf, default);
            Debug::DefaultFill {
                element: tree.name(parent),
                leaf: node.argument(),
            }
            .log();
        }
        Keyword::Container => {
            let element = match tree.find_element_child(parent, node.argument()) {
                Some(existing) => Some(existing),
                None if schema_has_default(spec, schema) => {
                    Some(tree.add_element(parent, node.argument(), Some(schema)))
                }
                None => None,
            };
            if let Some(element) = element {
                for child in spec.data_children(schema) {
                    fill_schema_driven(tree, spec, element, child);
                }
            }
        }
        Keyword::List => {
            let entries: Vec<XmlHandle> = tree
                .children(parent)
                .iter()
                .copied()
                .filter(|&h| tree.is_element(h) && tree.name(h) == node.argument())
                .collect();
            for entry in entries {
                for child in spec.data_children(schema) {
                    fill_schema_driven(tree, spec, entry, child);
                }
            }
        }
        Keyword::LeafList | Keyword::Module | Keyword::Submodule
        | Keyword::Choice | Keyword::Case => {}
    }
}

fn schema_has_default(spec: &YangSpec, schema: YangStmtHandle) -> bool {
    let node = spec.node(schema);
    match node.keyword() {
        Keyword::Leaf => node.default().is_some(),
        Keyword::Container => spec
            .data_children(schema)
            .iter()
            .any(|&c| schema_has_default(spec, c)),
        _ => false,
    }
}

/// Asserts I1 (`name(x) == argument(y)`) for every schema-bound element in
/// `tree`. Unconditionally enabled, per spec.md §9(b) — no feature flag
/// gates this check.
pub fn check(tree: &XmlTree, spec: &YangSpec) -> Result<()> {
    for element in tree.traverse_elements(tree.root()) {
        if element == tree.root() {
            continue;
        }
        if let Some(schema) = tree.schema(element) {
            let expected = spec.node(schema).argument();
            let actual = tree.name(element);
            if actual != expected {
                return Err(Error::SchemaMismatch {
                    element: actual.to_owned(),
                    schema: expected.to_owned(),
                });
            }
        }
    }
    Ok(())
}
