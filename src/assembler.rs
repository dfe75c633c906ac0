//
// SPDX-License-Identifier: MIT
//

//! C3: TreeAssembler — materializes KV pairs into an `XmlTree` guided by
//! `SchemaCursor`, per spec.md §4.3.

use itertools::Itertools;

use crate::cursor::{classify, SchemaCursor, Step};
use crate::debug::Debug;
use crate::error::{Error, Result};
use crate::path::split_key;
use crate::schema::YangSpec;
use crate::xml::{XmlHandle, XmlTree};

/// Integrates one (key, optional value) pair into `tree`. Idempotent: safe
/// to call repeatedly with the same or overlapping keys (spec.md §4.3,
/// "Ordering & tie-breaks").
pub fn integrate(
    tree: &mut XmlTree,
    spec: &YangSpec,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    Debug::Assemble { key, value }.log();

    let tokens = split_key(key)?;
    let mut tokens = tokens.into_iter();

    // Step 2: resolve the first token against the top-level schema nodes. A
    // top-level `list`/`leaf-list` is classified exactly like a nested one
    // so its key/value tokens are consumed here rather than mistaken for
    // further element names.
    let first = tokens.next().expect("split_key guarantees >= 2 tokens");
    let top_schema = spec
        .find_top(first)
        .ok_or_else(|| Error::UnknownNode(first.to_owned()))?;
    let root = tree.root();
    let remaining: Vec<&str> = tokens.collect();
    let mut idx = 0;

    let top_step = classify(spec, top_schema, first)?;
    let mut current = materialize(tree, spec, root, first, top_step, key, &remaining, &mut idx)?;

    let mut cursor = SchemaCursor::new(spec, top_schema);

    while idx < remaining.len() {
        let name = remaining[idx];
        idx += 1;

        let step = cursor.advance(name)?;
        current = materialize(tree, spec, current, name, step, key, &remaining, &mut idx)?;
    }

    if let Some(value) = value {
        if !value.is_empty() && tree.body_text(current).is_none() {
            tree.set_body(current, value);
        }
    }

    Ok(())
}

/// Materializes the element for `step` (named `name`) under `parent`,
/// consuming any key/value tokens `step` requires from `remaining` as it
/// goes. Shared between the top-level token and every subsequent one so a
/// top-level `list`/`leaf-list` is handled identically to a nested one.
fn materialize(
    tree: &mut XmlTree,
    spec: &YangSpec,
    parent: XmlHandle,
    name: &str,
    step: Step,
    key: &str,
    remaining: &[&str],
    idx: &mut usize,
) -> Result<XmlHandle> {
    match step {
        Step::LeafList(schema) => {
            let text = *remaining
                .get(*idx)
                .ok_or_else(|| Error::MalformedKey(key.to_owned()))?;
            *idx += 1;

            Ok(find_leaflist_instance(tree, parent, name, text).unwrap_or_else(|| {
                let instance = tree.add_element(parent, name, Some(schema));
                tree.set_body(instance, text);
                instance
            }))
        }
        Step::List { schema, key_leaves } => {
            let mut key_values = Vec::with_capacity(key_leaves.len());
            for key_name in &key_leaves {
                let key_value = *remaining.get(*idx).ok_or_else(|| {
                    Error::MalformedKey(format!(
                        "{key} (missing value for key leaf(s): {})",
                        key_leaves.iter().join(", ")
                    ))
                })?;
                *idx += 1;
                key_values.push((key_name.as_str(), key_value));
            }

            Ok(tree
                .find_list_entry(parent, name, &key_values)
                .unwrap_or_else(|| {
                    let entry = tree.add_element(parent, name, Some(schema));
                    for (key_name, key_value) in &key_values {
                        let key_schema = spec.find_child(schema, key_name);
                        let key_elem = tree.add_element(entry, key_name, key_schema);
                        tree.set_body(key_elem, key_value);
                    }
                    entry
                }))
        }
        Step::Plain(schema) => Ok(tree
            .find_element_child(parent, name)
            .unwrap_or_else(|| tree.add_element(parent, name, Some(schema)))),
    }
}

fn find_leaflist_instance(
    tree: &XmlTree,
    parent: XmlHandle,
    name: &str,
    value: &str,
) -> Option<XmlHandle> {
    tree.children(parent).iter().copied().find(|&child| {
        tree.is_element(child)
            && tree.name(child) == name
            && tree.body_text(child) == Some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{container, leaf, leaf_list, list, module};

    #[test]
    fn bare_container() {
        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![container("a", vec![leaf("b")])],
        )]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/a/b", Some("7")).unwrap();

        let root = tree.root();
        let a = tree.find_element_child(root, "a").unwrap();
        let b = tree.find_element_child(a, "b").unwrap();
        assert_eq!(tree.body_text(b), Some("7"));
    }

    #[test]
    fn list_with_composite_key() {
        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![list(
                "x",
                &["k1", "k2"],
                vec![leaf("k1"), leaf("k2"), leaf("v")],
            )],
        )]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/x/1/aa", None).unwrap();
        integrate(&mut tree, &spec, "/x/1/aa/k1", Some("1")).unwrap();
        integrate(&mut tree, &spec, "/x/1/aa/k2", Some("aa")).unwrap();
        integrate(&mut tree, &spec, "/x/1/aa/v", Some("hello")).unwrap();

        let root = tree.root();
        let entry = tree.find_list_entry(root, "x", &[("k1", "1"), ("k2", "aa")]).unwrap();
        let v = tree.find_element_child(entry, "v").unwrap();
        assert_eq!(tree.body_text(v), Some("hello"));
    }

    #[test]
    fn leaf_list_creates_sibling_instances() {
        let spec =
            YangSpec::from_modules(vec![module("m", vec![leaf_list("ll")])]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/ll/red", None).unwrap();
        integrate(&mut tree, &spec, "/ll/blue", None).unwrap();

        let root = tree.root();
        let instances: Vec<_> = tree
            .children(root)
            .iter()
            .filter(|&&h| tree.name(h) == "ll")
            .map(|&h| tree.body_text(h).unwrap().to_owned())
            .collect();
        assert_eq!(instances.len(), 2);
        assert!(instances.contains(&"red".to_string()));
        assert!(instances.contains(&"blue".to_string()));
    }

    #[test]
    fn integration_is_idempotent() {
        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![container("a", vec![leaf("b")])],
        )]);
        let mut tree = XmlTree::new();
        integrate(&mut tree, &spec, "/a/b", Some("7")).unwrap();
        integrate(&mut tree, &spec, "/a/b", Some("7")).unwrap();

        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
    }
}
