//
// SPDX-License-Identifier: MIT
//

//! A YANG-schema-driven XML configuration datastore over an ordered
//! key-value store.
//!
//! The crate translates between two path vocabularies (`KeyFormat`,
//! `XmlKey`), materializes key-value pairs into a schema-bound XML tree
//! (`TreeAssembler`, `DefaultFiller`), narrows that tree to XPath matches
//! plus ancestry (`Pruner`), and walks edit trees or single edit keys under
//! NETCONF operation semantics (`MutationEngine`). [`facade::DatastoreFacade`]
//! is the public entry point orchestrating all of the above over a `KV`
//! reference backend.

pub mod assembler;
pub mod config;
pub mod cursor;
pub mod debug;
pub mod defaults;
pub mod error;
pub mod facade;
pub mod kv;
pub mod mutation;
pub mod path;
pub mod pruner;
pub mod schema;
pub mod xml;

pub use error::{Error, Result};
pub use facade::DatastoreFacade;
pub use mutation::Operation;
pub use schema::{YangSpec, YangStmt, YangStmtHandle};
pub use xml::{XmlHandle, XmlTree};
