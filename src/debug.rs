//
// SPDX-License-Identifier: MIT
//

use tracing::{debug, debug_span, trace, trace_span};

use crate::mutation::Operation;

#[derive(Debug)]
pub enum Debug<'a> {
    Get { db: &'a str, xpath: Option<&'a str> },
    Assemble { key: &'a str, value: Option<&'a str> },
    Prune { matched: usize },
    DefaultFill { element: &'a str, leaf: &'a str },
    Put { db: &'a str, op: Operation },
    PutKey { db: &'a str, key: &'a str, op: Operation },
    MutationEmit { key: &'a str, op: Operation },
}

// ===== impl Debug =====

impl<'a> Debug<'a> {
    pub fn log(&self) {
        match self {
            Debug::Get { db, xpath } => {
                debug_span!("yangdb")
                    .in_scope(|| debug!(%db, ?xpath, "{}", self));
            }
            Debug::Assemble { key, value } => {
                trace_span!("yangdb")
                    .in_scope(|| trace!(%key, ?value, "{}", self));
            }
            Debug::Prune { matched } => {
                debug_span!("yangdb")
                    .in_scope(|| debug!(matched, "{}", self));
            }
            Debug::DefaultFill { element, leaf } => {
                trace_span!("yangdb")
                    .in_scope(|| trace!(%element, %leaf, "{}", self));
            }
            Debug::Put { db, op } => {
                debug_span!("yangdb")
                    .in_scope(|| debug!(%db, ?op, "{}", self));
            }
            Debug::PutKey { db, key, op } => {
                debug_span!("yangdb")
                    .in_scope(|| debug!(%db, %key, ?op, "{}", self));
            }
            Debug::MutationEmit { key, op } => {
                trace_span!("yangdb")
                    .in_scope(|| trace!(%key, ?op, "{}", self));
            }
        }
    }
}

impl<'a> std::fmt::Display for Debug<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::Get { .. } => write!(f, "datastore read"),
            Debug::Assemble { .. } => write!(f, "integrating kv pair"),
            Debug::Prune { .. } => write!(f, "pruning tree to xpath matches"),
            Debug::DefaultFill { .. } => write!(f, "injecting schema default"),
            Debug::Put { .. } => write!(f, "datastore edit-tree write"),
            Debug::PutKey { .. } => write!(f, "datastore keyed write"),
            Debug::MutationEmit { .. } => write!(f, "mutation engine kv emit"),
        }
    }
}
