//
// SPDX-License-Identifier: MIT
//

//! C6: MutationEngine — walks an edit tree or a single edit key, emitting
//! `KV` writes/deletes under NETCONF operation semantics, per spec.md §4.5.

use crate::cursor::Step;
use crate::debug::Debug;
use crate::error::{Error, Result};
use crate::kv::Kv;
use crate::path::split_key;
use crate::schema::{Keyword, YangSpec, YangStmtHandle};
use crate::xml::{XmlHandle, XmlTree};

/// NETCONF `operation` attribute values (spec.md §3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Merge,
    Replace,
    Create,
    Delete,
    Remove,
    None,
}

impl Operation {
    pub fn parse(s: &str) -> Result<Operation> {
        match s {
            "merge" => Ok(Operation::Merge),
            "replace" => Ok(Operation::Replace),
            "create" => Ok(Operation::Create),
            "delete" => Ok(Operation::Delete),
            "remove" => Ok(Operation::Remove),
            "none" => Ok(Operation::None),
            other => Err(Error::BadOperation(other.to_owned())),
        }
    }
}

pub struct MutationEngine<'a> {
    spec: &'a YangSpec,
    db: &'a str,
}

impl<'a> MutationEngine<'a> {
    pub fn new(spec: &'a YangSpec, db: &'a str) -> Self {
        MutationEngine { spec, db }
    }

    /// Walks `edit_tree` rooted at `element` (with schema `schema`),
    /// accumulating keys in document order, parent before child, siblings
    /// left-to-right (spec.md §5 ordering guarantees).
    pub fn put(
        &self,
        kv: &mut dyn Kv,
        tree: &XmlTree,
        element: XmlHandle,
        schema: YangStmtHandle,
        op: Operation,
        parent_key: &str,
    ) -> Result<()> {
        let node = self.spec.node(schema);
        let mut key = parent_key.to_owned();
        key.push('/');
        key.push_str(node.argument());

        let key_children = match node.keyword() {
            Keyword::List => {
                let mut leaves = Vec::new();
                for key_name in node.key_leaves() {
                    let key_child = tree
                        .find_element_child(element, key_name)
                        .ok_or_else(|| Error::MalformedKey(key.clone()))?;
                    let value = tree.body_text(key_child).unwrap_or("");
                    key.push('/');
                    key.push_str(value);
                    leaves.push(key_child);
                }
                leaves
            }
            Keyword::LeafList => {
                let value = tree.body_text(element).unwrap_or("");
                key.push('/');
                key.push_str(value);
                vec![]
            }
            _ => vec![],
        };

        Debug::MutationEmit { key: &key, op }.log();
        self.apply_op(kv, &key, op, tree.body_text(element))?;

        for child in tree.children(element) {
            if !tree.is_element(*child) || key_children.contains(child) {
                continue;
            }
            let Some(child_schema) = tree.schema(*child) else { continue };
            let child_op = child_operation(tree, *child).unwrap_or(op);
            self.put(kv, tree, *child, child_schema, child_op, &key)?;
        }

        Ok(())
    }

    fn apply_op(
        &self,
        kv: &mut dyn Kv,
        key: &str,
        op: Operation,
        value: Option<&str>,
    ) -> Result<()> {
        match op {
            Operation::Create => {
                if kv.exists(key)? {
                    return Err(Error::CreateExists(key.to_owned()));
                }
                kv.set(key, value)?;
            }
            Operation::Merge | Operation::Replace => {
                kv.set(key, value)?;
            }
            Operation::Delete => {
                if !kv.exists(key)? {
                    return Err(Error::DeleteMissing(key.to_owned()));
                }
                self.delete_matching(kv, key)?;
            }
            Operation::Remove => {
                self.delete_matching(kv, key)?;
            }
            Operation::None => {}
        }
        Ok(())
    }

    fn delete_matching(&self, kv: &mut dyn Kv, key: &str) -> Result<()> {
        let pattern = regex::Regex::new(&format!("^{}.*$", regex::escape(key)))
            .expect("escaped key is always a valid regex");
        let matches = kv.scan(&pattern)?;
        for (matched_key, _) in matches {
            kv.delete(&matched_key)?;
        }
        Ok(())
    }

    /// `put_key`: performs the same mutation as `put` without an edit tree,
    /// writing intermediate list-entry/key-leaf keys as empty-bodied
    /// entries when creating (spec.md §4.5).
    pub fn put_key(
        &self,
        kv: &mut dyn Kv,
        xml_key: &str,
        value: Option<&str>,
        op: Operation,
    ) -> Result<()> {
        Debug::PutKey { db: self.db, key: xml_key, op }.log();

        let segments = split_key(xml_key)?;
        let top_name = segments[0];
        let top_schema = self
            .spec
            .find_top(top_name)
            .ok_or_else(|| Error::UnknownNode(top_name.to_owned()))?;

        let mut key = String::new();
        let mut idx = 1;
        // Set when the cursor is still inside the entry of the last list
        // seen, together with that list's key-leaf names, so delete/remove
        // can lift the operation to the whole entry when the terminal
        // segment turns out to just be one of those key leaves.
        let mut last_list_entry: Option<String> = None;
        let mut list_key_leaves: Option<Vec<String>> = None;
        let write_intermediate = !matches!(op, Operation::Delete | Operation::Remove);

        // The first segment is resolved via `find_top`, not `find_child`,
        // but a top-level `list`/`leaf-list` still needs its key/value
        // tokens consumed the same way a nested one does.
        let top_step = crate::cursor::classify(self.spec, top_schema, top_name)?;
        accumulate_step(
            kv,
            top_step,
            top_name,
            &segments,
            &mut idx,
            &mut key,
            &mut last_list_entry,
            &mut list_key_leaves,
            write_intermediate,
            xml_key,
        )?;

        let mut cursor = crate::cursor::SchemaCursor::new(self.spec, top_schema);

        while idx < segments.len() {
            let name = segments[idx];
            idx += 1;
            let step = cursor.advance(name)?;
            accumulate_step(
                kv,
                step,
                name,
                &segments,
                &mut idx,
                &mut key,
                &mut last_list_entry,
                &mut list_key_leaves,
                write_intermediate,
                xml_key,
            )?;
        }

        match op {
            Operation::Delete | Operation::Remove => {
                // If the terminating component is a list's key leaf, lift
                // the operation to the whole list entry.
                let target = last_list_entry.unwrap_or(key);
                if matches!(op, Operation::Delete) && !kv.exists(&target)? {
                    return Err(Error::DeleteMissing(target));
                }
                self.delete_matching(kv, &target)?;
            }
            Operation::Create => {
                if kv.exists(&key)? {
                    return Err(Error::CreateExists(key));
                }
                kv.set(&key, value)?;
            }
            Operation::Merge | Operation::Replace => {
                kv.set(&key, value)?;
            }
            Operation::None => {}
        }

        Ok(())
    }
}

/// Appends `name` (classified as `step`) to `key`, consuming whatever
/// key/value tokens `step` requires from `segments`, and tracks whether the
/// cursor is still within a list entry's own key-leaf span (`last_list_entry`
/// / `list_key_leaves`) for `put_key`'s delete/remove entry-lift. Shared
/// between the first path segment (resolved via `find_top`) and every
/// subsequent one (resolved via `SchemaCursor::advance`).
fn accumulate_step(
    kv: &mut dyn Kv,
    step: Step,
    name: &str,
    segments: &[&str],
    idx: &mut usize,
    key: &mut String,
    last_list_entry: &mut Option<String>,
    list_key_leaves: &mut Option<Vec<String>>,
    write_intermediate: bool,
    xml_key: &str,
) -> Result<()> {
    match step {
        Step::Plain(_) => {
            key.push('/');
            key.push_str(name);
            let is_key_leaf = list_key_leaves
                .as_ref()
                .is_some_and(|leaves| leaves.iter().any(|leaf| leaf == name));
            if !is_key_leaf {
                *last_list_entry = None;
                *list_key_leaves = None;
            }
        }
        Step::LeafList(_) => {
            let text = *segments
                .get(*idx)
                .ok_or_else(|| Error::MalformedKey(xml_key.to_owned()))?;
            *idx += 1;
            key.push('/');
            key.push_str(name);
            key.push('/');
            key.push_str(text);
            *last_list_entry = None;
            *list_key_leaves = None;
        }
        Step::List { key_leaves, .. } => {
            key.push('/');
            key.push_str(name);
            for _ in &key_leaves {
                let key_value = *segments
                    .get(*idx)
                    .ok_or_else(|| Error::MalformedKey(xml_key.to_owned()))?;
                *idx += 1;
                key.push('/');
                key.push_str(key_value);
            }

            // Write an empty-bodied intermediate for the list entry once
            // the *whole* composite key has been assembled — never a
            // partial prefix, which `assembler::integrate` can't resolve
            // back into a key-leaf value — so a subsequent read
            // reconstructs the entry even when the caller's actual value
            // targets a sibling leaf further down the path.
            if write_intermediate && *idx < segments.len() && !kv.exists(key)? {
                kv.set(key, None)?;
            }
            *last_list_entry = Some(key.clone());
            *list_key_leaves = Some(key_leaves);
        }
    }
    Ok(())
}

/// Reads the `operation` attribute off an element, if present, represented
/// as a same-named child with reserved name `@operation` (the minimal
/// stand-in for real XML attributes this crate's `XmlNode` doesn't model).
fn child_operation(tree: &XmlTree, element: XmlHandle) -> Option<Operation> {
    let attr = tree.find_element_child(element, "@operation")?;
    let text = tree.body_text(attr)?;
    Operation::parse(text).ok()
}
