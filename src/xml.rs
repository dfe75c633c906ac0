//
// SPDX-License-Identifier: MIT
//

//! Arena-backed `XmlNode` tree.
//!
//! The real XML parser/serializer is out of scope (spec.md §1); this is
//! the interchange type every other module in the crate builds, prunes and
//! mutates. Same arena-plus-handle shape as [`crate::schema`], following
//! `holo-isis/src/collections.rs`.

use bitflags::bitflags;
use derive_new::new;
use enum_as_inner::EnumAsInner;
use generational_arena::Arena;

use crate::schema::YangStmtHandle;

bitflags! {
    /// Transient per-node flags. `MARK` implements I5: set by the XPath
    /// evaluator's matches before a [`crate::pruner::Pruner`] pass, cleared
    /// unconditionally on exit so the tree stays reusable.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct NodeFlags: u8 {
        const MARK = 0b0000_0001;
    }
}

/// Stable, non-owning handle into an [`XmlTree`]'s arena.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct XmlHandle(generational_arena::Index);

#[derive(Debug, new)]
pub struct ElementData {
    pub name: String,
    /// Back-reference to the schema node this element is bound to (I1).
    /// `None` only for the synthetic tree root.
    pub schema: Option<YangStmtHandle>,
    pub parent: Option<XmlHandle>,
    #[new(default)]
    pub children: Vec<XmlHandle>,
    #[new(value = "NodeFlags::empty()")]
    pub flags: NodeFlags,
}

#[derive(Debug, new)]
pub struct BodyData {
    pub text: String,
    pub parent: XmlHandle,
}

/// The two node shapes of spec.md §3: element or body (leaf text).
#[derive(Debug, EnumAsInner)]
pub enum XmlNodeData {
    Element(ElementData),
    Body(BodyData),
}

/// A full XML tree, arena-owned, rooted at a synthetic node.
pub struct XmlTree {
    arena: Arena<XmlNodeData>,
    root: XmlHandle,
}

impl XmlTree {
    pub const ROOT_NAME: &'static str = "<root>";

    pub fn new() -> XmlTree {
        let mut arena = Arena::new();
        let root = XmlHandle(arena.insert(XmlNodeData::Element(ElementData::new(
            XmlTree::ROOT_NAME.to_owned(),
            None,
            None,
        ))));
        XmlTree { arena, root }
    }

    pub fn root(&self) -> XmlHandle {
        self.root
    }

    pub fn node(&self, handle: XmlHandle) -> &XmlNodeData {
        &self.arena[handle.0]
    }

    pub fn element(&self, handle: XmlHandle) -> &ElementData {
        self.arena[handle.0]
            .as_element()
            .expect("handle doesn't reference an element")
    }

    fn element_mut(&mut self, handle: XmlHandle) -> &mut ElementData {
        self.arena[handle.0]
            .as_element_mut()
            .expect("handle doesn't reference an element")
    }

    pub fn name(&self, handle: XmlHandle) -> &str {
        match &self.arena[handle.0] {
            XmlNodeData::Element(e) => &e.name,
            XmlNodeData::Body(_) => "",
        }
    }

    pub fn parent(&self, handle: XmlHandle) -> Option<XmlHandle> {
        match &self.arena[handle.0] {
            XmlNodeData::Element(e) => e.parent,
            XmlNodeData::Body(b) => Some(b.parent),
        }
    }

    /// Creates a new child element under `parent`, appending it to
    /// `parent`'s children (preserving insertion order, per I2's
    /// "key leaves appear before non-key siblings" requirement — callers
    /// are responsible for inserting key leaves first).
    pub fn add_element(
        &mut self,
        parent: XmlHandle,
        name: &str,
        schema: Option<YangStmtHandle>,
    ) -> XmlHandle {
        let handle = XmlHandle(self.arena.insert(XmlNodeData::Element(
            ElementData::new(name.to_owned(), schema, Some(parent)),
        )));
        self.element_mut(parent).children.push(handle);
        handle
    }

    /// Finds a direct element child of `parent` named `name`.
    pub fn find_element_child(
        &self,
        parent: XmlHandle,
        name: &str,
    ) -> Option<XmlHandle> {
        self.element(parent)
            .children
            .iter()
            .copied()
            .find(|&child| {
                matches!(
                    &self.arena[child.0],
                    XmlNodeData::Element(e) if e.name == name
                )
            })
    }

    /// Finds a `list` entry among `parent`'s children whose key-leaf
    /// children match `key_values` (ordered pairs of leaf name, body
    /// text), per spec.md §4.3's byte-wise tuple comparison.
    pub fn find_list_entry(
        &self,
        parent: XmlHandle,
        list_name: &str,
        key_values: &[(&str, &str)],
    ) -> Option<XmlHandle> {
        self.element(parent)
            .children
            .iter()
            .copied()
            .filter(|&child| self.name(child) == list_name)
            .find(|&entry| {
                key_values.iter().all(|(key_name, key_value)| {
                    self.find_element_child(entry, key_name)
                        .and_then(|k| self.body_text(k))
                        == Some(*key_value)
                })
            })
    }

    /// Returns this element's body text, if it has a body child.
    pub fn body_text(&self, element: XmlHandle) -> Option<&str> {
        self.element(element)
            .children
            .iter()
            .find_map(|&child| match &self.arena[child.0] {
                XmlNodeData::Body(b) => Some(b.text.as_str()),
                _ => None,
            })
    }

    /// Attaches a body child with `text` to `element`, which must not
    /// already have one (spec.md §3: "at most one body child").
    pub fn set_body(&mut self, element: XmlHandle, text: &str) {
        debug_assert!(self.body_text(element).is_none());
        let handle = XmlHandle(self.arena.insert(XmlNodeData::Body(
            BodyData::new(text.to_owned(), element),
        )));
        self.element_mut(element).children.push(handle);
    }

    pub fn is_element(&self, handle: XmlHandle) -> bool {
        self.arena[handle.0].is_element()
    }

    pub fn children(&self, handle: XmlHandle) -> &[XmlHandle] {
        match &self.arena[handle.0] {
            XmlNodeData::Element(e) => &e.children,
            XmlNodeData::Body(_) => &[],
        }
    }

    pub fn schema(&self, handle: XmlHandle) -> Option<YangStmtHandle> {
        match &self.arena[handle.0] {
            XmlNodeData::Element(e) => e.schema,
            XmlNodeData::Body(_) => None,
        }
    }

    pub fn mark(&mut self, handle: XmlHandle) {
        if let XmlNodeData::Element(e) = &mut self.arena[handle.0] {
            e.flags.insert(NodeFlags::MARK);
        }
    }

    pub fn is_marked(&self, handle: XmlHandle) -> bool {
        matches!(
            &self.arena[handle.0],
            XmlNodeData::Element(e) if e.flags.contains(NodeFlags::MARK)
        )
    }

    fn unmark(&mut self, handle: XmlHandle) {
        if let XmlNodeData::Element(e) = &mut self.arena[handle.0] {
            e.flags.remove(NodeFlags::MARK);
        }
    }

    /// Clears `MARK` on every element in the tree (I5).
    pub fn clear_marks(&mut self) {
        let elements: Vec<_> = self
            .arena
            .iter()
            .filter_map(|(idx, data)| match data {
                XmlNodeData::Element(_) => Some(XmlHandle(idx)),
                XmlNodeData::Body(_) => None,
            })
            .collect();
        for handle in elements {
            self.unmark(handle);
        }
    }

    /// Removes `child` (and everything under it) from `parent`'s children
    /// list. Used only by [`crate::pruner::Pruner`].
    pub fn remove_child(&mut self, parent: XmlHandle, child: XmlHandle) {
        self.element_mut(parent).children.retain(|&c| c != child);
    }

    /// Pre-order traversal of element descendants of `handle` (`handle`
    /// itself included), skipping body nodes.
    pub fn traverse_elements(&self, handle: XmlHandle) -> Vec<XmlHandle> {
        let mut out = vec![handle];
        let mut stack: Vec<XmlHandle> = self
            .children(handle)
            .iter()
            .rev()
            .filter(|&&c| matches!(self.arena[c.0], XmlNodeData::Element(_)))
            .copied()
            .collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children: Vec<_> = self
                .children(next)
                .iter()
                .rev()
                .filter(|&&c| matches!(self.arena[c.0], XmlNodeData::Element(_)))
                .copied()
                .collect();
            stack.append(&mut children);
        }
        out
    }
}

impl Default for XmlTree {
    fn default() -> Self {
        XmlTree::new()
    }
}
