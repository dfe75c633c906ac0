//
// SPDX-License-Identifier: MIT
//

//! C2: SchemaCursor — walks a `YangSpec` following named path elements,
//! resolving list keys, per spec.md §4.2.

use crate::error::{Error, Result};
use crate::schema::{Keyword, YangSpec, YangStmtHandle};

/// What advancing the cursor by one element name resolved to.
#[derive(Clone, Debug)]
pub enum Step {
    /// `container` / `leaf` / other: the next key token is another element
    /// name.
    Plain(YangStmtHandle),
    /// `list`: the cursor stays at the list entry while the caller
    /// consumes one value token per key leaf, in declared order.
    List { schema: YangStmtHandle, key_leaves: Vec<String> },
    /// `leaf-list`: the caller consumes exactly one value token.
    LeafList(YangStmtHandle),
}

pub struct SchemaCursor<'a> {
    spec: &'a YangSpec,
    current: YangStmtHandle,
}

impl<'a> SchemaCursor<'a> {
    pub fn new(spec: &'a YangSpec, top: YangStmtHandle) -> Self {
        SchemaCursor { spec, current: top }
    }

    pub fn current(&self) -> YangStmtHandle {
        self.current
    }

    /// Advances the cursor to the child named `name`, and classifies it.
    pub fn advance(&mut self, name: &str) -> Result<Step> {
        let next = self
            .spec
            .find_child(self.current, name)
            .ok_or_else(|| Error::UnknownNode(name.to_owned()))?;
        self.current = next;
        classify(self.spec, next, name)
    }
}

/// Classifies `handle` (named `name` on the path being walked) the same way
/// [`SchemaCursor::advance`] classifies a resolved child. Exposed standalone
/// so [`crate::assembler::integrate`] can classify the *first* path token
/// too — it is resolved via [`YangSpec::find_top`], not `find_child`, but a
/// top-level `list`/`leaf-list` still needs its key/value tokens consumed
/// the same way a nested one does.
pub fn classify(spec: &YangSpec, handle: YangStmtHandle, name: &str) -> Result<Step> {
    let node = spec.node(handle);
    match node.keyword() {
        Keyword::List => {
            if node.key_leaves().is_empty() {
                return Err(Error::ListWithoutKey(name.to_owned()));
            }
            Ok(Step::List {
                schema: handle,
                key_leaves: node.key_leaves().to_vec(),
            })
        }
        Keyword::LeafList => Ok(Step::LeafList(handle)),
        _ => Ok(Step::Plain(handle)),
    }
}
