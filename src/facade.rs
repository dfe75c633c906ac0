//
// SPDX-License-Identifier: MIT
//

//! C7: DatastoreFacade — the public `get`/`get_vec`/`put`/`put_key`
//! surface, orchestrating C1–C6 over `KV`, per spec.md §4.6.

use regex::Regex;

use crate::assembler::integrate;
use crate::config::Config;
use crate::debug::Debug;
use crate::defaults;
use crate::error::Result;
use crate::kv::{Kv, PickleKv};
use crate::mutation::{MutationEngine, Operation};
use crate::pruner::{self, XPathEvaluator};
use crate::schema::YangSpec;
use crate::xml::{XmlHandle, XmlTree};

/// Public entry point wrapping one named datastore (`running`, `candidate`,
/// `startup`, ...).
pub struct DatastoreFacade {
    config: Config,
    db_name: String,
    kv: PickleKv,
}

impl DatastoreFacade {
    pub fn open(config: Config, db_name: &str) -> Result<DatastoreFacade> {
        let kv = PickleKv::open(&config, db_name)?;
        Ok(DatastoreFacade { config, db_name: db_name.to_owned(), kv })
    }

    /// Loads every pair from the datastore, assembles a tree, fills
    /// defaults and validates it. If `xpath` is non-empty, `evaluator` is
    /// run against the freshly assembled tree to find matches, which are
    /// then marked and pruned to (spec.md §4.6). `evaluator` is required
    /// whenever `xpath` is `Some`.
    pub fn get(
        &self,
        spec: &YangSpec,
        xpath: Option<(&str, &dyn XPathEvaluator)>,
    ) -> Result<XmlTree> {
        let (tree, _) = self.get_vec(spec, xpath)?;
        Ok(tree)
    }

    /// Same as [`Self::get`], but also returns the (unpruned-survivor)
    /// match vector the evaluator produced (spec.md §4.6).
    pub fn get_vec(
        &self,
        spec: &YangSpec,
        xpath: Option<(&str, &dyn XPathEvaluator)>,
    ) -> Result<(XmlTree, Vec<XmlHandle>)> {
        Debug::Get { db: &self.db_name, xpath: xpath.map(|(q, _)| q) }.log();

        let mut tree = XmlTree::new();
        tree.clear_marks();

        let all = Regex::new("^.*$").expect("trivial pattern is always valid");
        let pairs = self.kv.scan(&all)?;
        for (key, value) in &pairs {
            integrate(&mut tree, spec, key, value.as_deref())?;
        }

        let matches = match xpath {
            Some((query, evaluator)) => {
                let matches = evaluator.evaluate(&tree, query);
                pruner::prune(&mut tree, &matches);
                matches
            }
            None => Vec::new(),
        };

        defaults::fill(&mut tree, spec);
        defaults::check(&tree, spec)?;

        Ok((tree, matches))
    }

    /// Applies `edit_tree` (an assembled [`XmlTree`] whose elements carry
    /// per-element operations) against the datastore. `op` is the
    /// datastore-level operation for the top-level elements; a top-level
    /// `replace` reinitializes the whole datastore before walking (spec.md
    /// §4.5 "replace at datastore level").
    pub fn put(
        &mut self,
        spec: &YangSpec,
        edit_tree: &XmlTree,
        op: Operation,
    ) -> Result<()> {
        Debug::Put { db: &self.db_name, op }.log();

        if matches!(op, Operation::Replace) {
            self.kv.unlink_and_reinit(&self.config)?;
        }
        let walk_op = if matches!(op, Operation::Replace) { Operation::Merge } else { op };

        let engine = MutationEngine::new(spec, &self.db_name);
        let root = edit_tree.root();
        for &top in edit_tree.children(root) {
            if !edit_tree.is_element(top) {
                continue;
            }
            let Some(schema) = edit_tree.schema(top) else { continue };
            engine.put(&mut self.kv, edit_tree, top, schema, walk_op, "")?;
        }
        Ok(())
    }

    /// Applies a single `(xml_key, value)` mutation without an edit tree
    /// (spec.md §4.5 `put_key`).
    pub fn put_key(
        &mut self,
        spec: &YangSpec,
        xml_key: &str,
        value: Option<&str>,
        op: Operation,
    ) -> Result<()> {
        if matches!(op, Operation::Replace) {
            self.kv.unlink_and_reinit(&self.config)?;
        }
        let walk_op = if matches!(op, Operation::Replace) { Operation::Merge } else { op };

        let engine = MutationEngine::new(spec, &self.db_name);
        engine.put_key(&mut self.kv, xml_key, value, walk_op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DumpPolicy;
    use crate::schema::{container, leaf, leaf_default, module};

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            database_dir: dir.to_string_lossy().into_owned(),
            dump_policy: DumpPolicy::AutoDump,
        }
    }

    #[test]
    fn put_key_then_get_round_trips_with_defaults() {
        let dir = std::env::temp_dir().join(format!(
            "yangdb-test-facade-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let config = test_config(&dir);

        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![container(
                "c",
                vec![leaf("explicit"), leaf_default("defaulted", "42")],
            )],
        )]);

        let mut facade = DatastoreFacade::open(config, "running").unwrap();
        facade
            .put_key(&spec, "/c/explicit", Some("7"), Operation::Merge)
            .unwrap();

        let tree = facade.get(&spec, None).unwrap();
        let root = tree.root();
        let c = tree.find_element_child(root, "c").unwrap();
        let explicit = tree.find_element_child(c, "explicit").unwrap();
        assert_eq!(tree.body_text(explicit), Some("7"));
        let defaulted = tree.find_element_child(c, "defaulted").unwrap();
        assert_eq!(tree.body_text(defaulted), Some("42"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replace_reinitializes_before_merge() {
        let dir = std::env::temp_dir().join(format!(
            "yangdb-test-facade-replace-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let config = test_config(&dir);

        let spec = YangSpec::from_modules(vec![module(
            "m",
            vec![container("c", vec![leaf("a"), leaf("b")])],
        )]);

        let mut facade = DatastoreFacade::open(config, "running").unwrap();
        facade
            .put_key(&spec, "/c/a", Some("1"), Operation::Merge)
            .unwrap();
        facade
            .put_key(&spec, "/c/b", Some("2"), Operation::Replace)
            .unwrap();

        let tree = facade.get(&spec, None).unwrap();
        let root = tree.root();
        let c = tree.find_element_child(root, "c").unwrap();
        assert!(tree.find_element_child(c, "a").is_none());
        assert!(tree.find_element_child(c, "b").is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
