//
// SPDX-License-Identifier: MIT
//

//! C1: PathCodec — translation between a YANG statement and the two path
//! vocabularies (`KeyFormat`, `XmlKey`), per spec.md §4.1.

use regex::Regex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::schema::{Keyword, YangSpec, YangStmtHandle};

/// An `XmlKey` with `%s` at every list-key/leaf-list placeholder position.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyFormat(pub String);

/// `/` + `name` ( `/` `name` | `/` `key-value` )* — spec.md §3.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct XmlKey(pub String);

/// An ordered sequence of string-valued variables. Index 0 is a
/// non-substitutable label (the CLI command name); the last entry may be
/// absent to wildcard the final placeholder.
#[derive(Clone, Debug, Default)]
pub struct ValueVec(pub Vec<String>);

impl ValueVec {
    pub fn new(label: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        let mut v = vec![label.into()];
        v.extend(values);
        ValueVec(v)
    }
}

impl std::fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for XmlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Splits a raw key string into its `/`-delimited segments, enforcing the
/// grammar of spec.md §4.3 step 1: must begin with `/` and have at least
/// two tokens.
pub fn split_key(key: &str) -> Result<Vec<&str>> {
    if !key.starts_with('/') {
        return Err(Error::MalformedKey(key.to_owned()));
    }
    let segments: Vec<&str> = key.split('/').skip(1).collect();
    if segments.len() < 2 {
        return Err(Error::MalformedKey(key.to_owned()));
    }
    Ok(segments)
}

/// `schema_to_format`: ascend to the module/submodule root, then render
/// downward, skipping `choice`/`case` and appending one `%s` per list key
/// (or exactly one for a `leaf-list`).
pub fn schema_to_format(spec: &YangSpec, y: YangStmtHandle) -> KeyFormat {
    let mut chain = vec![y];
    let mut current = spec.node(y);
    while let Some(parent) = current.parent() {
        if matches!(parent.keyword(), Keyword::Module | Keyword::Submodule) {
            break;
        }
        chain.push(parent.handle());
        current = parent;
    }
    chain.reverse();

    let mut out = String::new();
    for handle in chain {
        let node = spec.node(handle);
        if node.keyword().is_path_transparent() {
            continue;
        }
        out.push('/');
        out.push_str(node.argument());
        match node.keyword() {
            Keyword::List => {
                for _ in node.key_leaves() {
                    out.push_str("/%s");
                }
            }
            Keyword::LeafList => out.push_str("/%s"),
            _ => {}
        }
    }
    KeyFormat(out)
}

/// `format_and_values_to_key`: substitutes each `%s` with the next value
/// from `values` (starting at index 1). Fails with `BadFormat` only if
/// `values` is critically short; an over-length `values` is logged and
/// ignored.
pub fn format_and_values_to_key(
    fmt: &KeyFormat,
    values: &ValueVec,
) -> Result<XmlKey> {
    let mut out = String::new();
    let mut idx = 1usize;
    for seg in fmt.0.split('/').skip(1) {
        out.push('/');
        if seg == "%s" {
            let value = values
                .0
                .get(idx)
                .ok_or_else(|| Error::BadFormat(fmt.0.clone()))?;
            out.push_str(value);
            idx += 1;
        } else {
            out.push_str(seg);
        }
    }
    if idx < values.0.len() {
        warn!(format = %fmt.0, "value vector longer than key format, ignoring extra values");
    }
    Ok(XmlKey(out))
}

/// `format_and_values_to_regex`: same substitution, but once `values` runs
/// out the remaining placeholder (and everything after it) collapses to a
/// single `.*`, and the whole pattern is anchored with `^…$` for
/// prefix/wildcard deletion.
pub fn format_and_values_to_regex(fmt: &KeyFormat, values: &ValueVec) -> Regex {
    let mut out = String::from("^");
    let mut idx = 1usize;
    for seg in fmt.0.split('/').skip(1) {
        if seg == "%s" {
            match values.0.get(idx) {
                Some(value) => {
                    out.push('/');
                    out.push_str(&regex::escape(value));
                    idx += 1;
                }
                None => {
                    out.push_str(".*");
                    break;
                }
            }
        } else {
            out.push('/');
            out.push_str(&regex::escape(seg));
        }
    }
    out.push('$');
    Regex::new(&out).expect("generated pattern is always a valid regex")
}
