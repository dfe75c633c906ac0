//
// SPDX-License-Identifier: MIT
//

//! Concrete, arena-backed realization of the `YangStmt`/`YangSpec` contract.
//!
//! The actual YANG parser is out of scope (spec.md §1); this module plays
//! its role well enough for `PathCodec`/`SchemaCursor`/`TreeAssembler` to
//! compile and be tested standalone, following the arena-plus-stable-handle
//! guidance of spec.md §9 and the `Arena<T>(generational_arena::Arena<T>)`
//! pattern used throughout `holo-isis/src/collections.rs`.

use std::collections::HashMap;

use generational_arena::Arena;

/// `YangStmt.keyword`. A tagged enum, per spec.md §9 ("no dynamic dispatch
/// in the core; `keyword` is naturally a tagged enum").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Keyword {
    Module,
    Submodule,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
}

impl Keyword {
    /// Schema-only nodes that are invisible on the data path (spec.md
    /// §4.1).
    pub fn is_path_transparent(&self) -> bool {
        matches!(self, Keyword::Choice | Keyword::Case)
    }
}

/// Stable, non-owning handle into a `YangSpec`'s arena.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct YangStmtHandle(generational_arena::Index);

struct YangStmtData {
    keyword: Keyword,
    argument: String,
    parent: Option<YangStmtHandle>,
    children: Vec<YangStmtHandle>,
    /// `list`-key leaf names, in declared order. Empty for every keyword
    /// other than `List` (where it must be non-empty, see
    /// `ListWithoutKey`).
    key_leaves: Vec<String>,
    /// Present only for `Leaf`/`LeafList` nodes that declare a default.
    default: Option<String>,
}

/// The set of top-level modules plus every node reachable from them.
pub struct YangSpec {
    arena: Arena<YangStmtData>,
    /// Top-level data nodes (direct children of a module/submodule,
    /// transparently descending through `choice`/`case`), keyed by
    /// argument name.
    tops: HashMap<String, YangStmtHandle>,
}

/// A node, builder-side: the shape fed to [`YangSpec::from_modules`].
pub enum StmtSpec {
    Module(String, Vec<StmtSpec>),
    Container(String, Vec<StmtSpec>),
    List(String, Vec<String>, Vec<StmtSpec>),
    Leaf(String, Option<String>),
    LeafList(String),
    Choice(String, Vec<StmtSpec>),
    Case(String, Vec<StmtSpec>),
}

pub fn module(name: &str, children: Vec<StmtSpec>) -> StmtSpec {
    StmtSpec::Module(name.to_owned(), children)
}

pub fn container(name: &str, children: Vec<StmtSpec>) -> StmtSpec {
    StmtSpec::Container(name.to_owned(), children)
}

pub fn list(name: &str, keys: &[&str], children: Vec<StmtSpec>) -> StmtSpec {
    StmtSpec::List(
        name.to_owned(),
        keys.iter().map(|s| s.to_string()).collect(),
        children,
    )
}

pub fn leaf(name: &str) -> StmtSpec {
    StmtSpec::Leaf(name.to_owned(), None)
}

pub fn leaf_default(name: &str, default: &str) -> StmtSpec {
    StmtSpec::Leaf(name.to_owned(), Some(default.to_owned()))
}

pub fn leaf_list(name: &str) -> StmtSpec {
    StmtSpec::LeafList(name.to_owned())
}

pub fn choice(name: &str, children: Vec<StmtSpec>) -> StmtSpec {
    StmtSpec::Choice(name.to_owned(), children)
}

pub fn case(name: &str, children: Vec<StmtSpec>) -> StmtSpec {
    StmtSpec::Case(name.to_owned(), children)
}

// ===== impl YangSpec =====

impl YangSpec {
    pub fn from_modules(modules: Vec<StmtSpec>) -> YangSpec {
        let mut arena = Arena::new();
        let mut module_handles = Vec::new();
        for m in &modules {
            module_handles.push(insert_node(&mut arena, None, m));
        }

        let mut tops = HashMap::new();
        for module_handle in module_handles {
            collect_data_children(&arena, module_handle, &mut tops);
        }

        YangSpec { arena, tops }
    }

    pub fn find_top(&self, name: &str) -> Option<YangStmtHandle> {
        self.tops.get(name).copied()
    }

    /// All top-level data nodes, in unspecified order.
    pub fn tops(&self) -> impl Iterator<Item = YangStmtHandle> + '_ {
        self.tops.values().copied()
    }

    pub fn find_child(
        &self,
        parent: YangStmtHandle,
        name: &str,
    ) -> Option<YangStmtHandle> {
        find_child_rec(&self.arena, parent, name)
    }

    pub fn node(&self, handle: YangStmtHandle) -> YangStmt<'_> {
        YangStmt { spec: self, handle }
    }

    /// Direct data children of `parent`, transparently descending through
    /// `choice`/`case` wrappers (invisible on the data path, spec.md
    /// §4.1).
    pub fn data_children(&self, parent: YangStmtHandle) -> Vec<YangStmtHandle> {
        let mut out = Vec::new();
        collect_data_children_vec(&self.arena, parent, &mut out);
        out
    }
}

fn collect_data_children_vec(
    arena: &Arena<YangStmtData>,
    parent: YangStmtHandle,
    out: &mut Vec<YangStmtHandle>,
) {
    for &child in &arena[parent.0].children {
        let data = &arena[child.0];
        if data.keyword.is_path_transparent() {
            collect_data_children_vec(arena, child, out);
        } else {
            out.push(child);
        }
    }
}

fn insert_node(
    arena: &mut Arena<YangStmtData>,
    parent: Option<YangStmtHandle>,
    spec: &StmtSpec,
) -> YangStmtHandle {
    let (keyword, argument, key_leaves, default, child_specs): (
        _,
        _,
        Vec<String>,
        _,
        &[StmtSpec],
    ) = match spec {
        StmtSpec::Module(name, children) => {
            (Keyword::Module, name, vec![], None, children.as_slice())
        }
        StmtSpec::Container(name, children) => {
            (Keyword::Container, name, vec![], None, children.as_slice())
        }
        StmtSpec::List(name, keys, children) => (
            Keyword::List,
            name,
            keys.clone(),
            None,
            children.as_slice(),
        ),
        StmtSpec::Leaf(name, default) => {
            (Keyword::Leaf, name, vec![], default.clone(), &[])
        }
        StmtSpec::LeafList(name) => (Keyword::LeafList, name, vec![], None, &[]),
        StmtSpec::Choice(name, children) => {
            (Keyword::Choice, name, vec![], None, children.as_slice())
        }
        StmtSpec::Case(name, children) => {
            (Keyword::Case, name, vec![], None, children.as_slice())
        }
    };

    let index = arena.insert(YangStmtData {
        keyword,
        argument: argument.clone(),
        parent,
        children: vec![],
        key_leaves,
        default,
    });
    let handle = YangStmtHandle(index);

    let children: Vec<_> = child_specs
        .iter()
        .map(|c| insert_node(arena, Some(handle), c))
        .collect();
    arena[handle.0].children = children;

    handle
}

fn find_child_rec(
    arena: &Arena<YangStmtData>,
    parent: YangStmtHandle,
    name: &str,
) -> Option<YangStmtHandle> {
    for &child in &arena[parent.0].children {
        let data = &arena[child.0];
        if data.keyword.is_path_transparent() {
            if let Some(found) = find_child_rec(arena, child, name) {
                return Some(found);
            }
        } else if data.argument == name {
            return Some(child);
        }
    }
    None
}

fn collect_data_children(
    arena: &Arena<YangStmtData>,
    parent: YangStmtHandle,
    out: &mut HashMap<String, YangStmtHandle>,
) {
    for &child in &arena[parent.0].children {
        let data = &arena[child.0];
        if data.keyword.is_path_transparent() {
            collect_data_children(arena, child, out);
        } else {
            out.insert(data.argument.clone(), child);
        }
    }
}

/// Borrowed accessor over a resolved schema node, mirroring the read-only
/// query surface spec.md §3 attributes to `YangStmt`.
#[derive(Clone, Copy)]
pub struct YangStmt<'a> {
    spec: &'a YangSpec,
    handle: YangStmtHandle,
}

impl<'a> YangStmt<'a> {
    pub fn handle(&self) -> YangStmtHandle {
        self.handle
    }

    pub fn keyword(&self) -> Keyword {
        self.spec.arena[self.handle.0].keyword
    }

    pub fn argument(&self) -> &'a str {
        &self.spec.arena[self.handle.0].argument
    }

    pub fn parent(&self) -> Option<YangStmt<'a>> {
        self.spec.arena[self.handle.0]
            .parent
            .map(|handle| YangStmt { spec: self.spec, handle })
    }

    pub fn children(&self) -> impl Iterator<Item = YangStmt<'a>> + 'a {
        let spec = self.spec;
        spec.arena[self.handle.0]
            .children
            .iter()
            .map(move |&handle| YangStmt { spec, handle })
    }

    /// Ancestors from immediate parent up to (and excluding) the module
    /// root, matching the ascent `schema_to_format` performs.
    pub fn ancestors(&self) -> impl Iterator<Item = YangStmt<'a>> + 'a {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    pub fn key_leaves(&self) -> &'a [String] {
        &self.spec.arena[self.handle.0].key_leaves
    }

    pub fn default(&self) -> Option<&'a str> {
        self.spec.arena[self.handle.0].default.as_deref()
    }
}
