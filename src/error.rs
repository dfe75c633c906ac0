//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

/// Core datastore errors.
///
/// Variants follow the taxonomy of the error handling design: Input,
/// Schema, Precondition and Backend kinds. The walk aborts at the first
/// failure; callers are expected to discard or commit the candidate
/// datastore around these calls rather than expect partial rollback.
#[derive(Debug)]
pub enum Error {
    // ----- Input -----
    MalformedKey(String),
    BadFormat(String),
    BadOperation(String),

    // ----- Schema -----
    UnknownNode(String),
    SchemaMismatch { element: String, schema: String },
    ListWithoutKey(String),

    // ----- Precondition -----
    CreateExists(String),
    DeleteMissing(String),

    // ----- Backend -----
    KvScanFailed(String),
    KvWriteFailed(String),
    KvInitFailed(String),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::MalformedKey(key) => warn!(%key, "{}", self),
            Error::BadFormat(fmt) => warn!(%fmt, "{}", self),
            Error::BadOperation(op) => warn!(%op, "{}", self),
            Error::UnknownNode(name) => warn!(%name, "{}", self),
            Error::SchemaMismatch { element, schema } => {
                warn!(%element, %schema, "{}", self)
            }
            Error::ListWithoutKey(name) => warn!(%name, "{}", self),
            Error::CreateExists(key) => warn!(%key, "{}", self),
            Error::DeleteMissing(key) => warn!(%key, "{}", self),
            Error::KvScanFailed(cause) => warn!(%cause, "{}", self),
            Error::KvWriteFailed(cause) => warn!(%cause, "{}", self),
            Error::KvInitFailed(cause) => warn!(%cause, "{}", self),
        }
    }

    /// NETCONF `error-type` classification for a front end to build an
    /// `rpc-error` from, without duplicating the taxonomy above.
    pub fn netconf_error_type(&self) -> &'static str {
        match self {
            Error::MalformedKey(..)
            | Error::BadFormat(..)
            | Error::BadOperation(..)
            | Error::UnknownNode(..)
            | Error::SchemaMismatch { .. }
            | Error::ListWithoutKey(..)
            | Error::CreateExists(..)
            | Error::DeleteMissing(..) => "application",
            Error::KvScanFailed(..)
            | Error::KvWriteFailed(..)
            | Error::KvInitFailed(..) => "operation-failed",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedKey(key) => {
                write!(f, "malformed xml key: {key}")
            }
            Error::BadFormat(fmt) => {
                write!(f, "value vector too short for key format: {fmt}")
            }
            Error::BadOperation(op) => {
                write!(f, "unknown netconf operation: {op}")
            }
            Error::UnknownNode(name) => {
                write!(f, "unknown schema node: {name}")
            }
            Error::SchemaMismatch { element, schema } => {
                write!(
                    f,
                    "element name '{element}' doesn't match schema argument '{schema}'"
                )
            }
            Error::ListWithoutKey(name) => {
                write!(f, "list node has no key statement: {name}")
            }
            Error::CreateExists(key) => {
                write!(f, "create failed, key already exists: {key}")
            }
            Error::DeleteMissing(key) => {
                write!(f, "delete failed, key doesn't exist: {key}")
            }
            Error::KvScanFailed(cause) => {
                write!(f, "key-value scan failed: {cause}")
            }
            Error::KvWriteFailed(cause) => {
                write!(f, "key-value write failed: {cause}")
            }
            Error::KvInitFailed(cause) => {
                write!(f, "key-value store initialization failed: {cause}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
