//
// SPDX-License-Identifier: MIT
//

//! The `KV` contract the core consumes (spec.md §6), plus `PickleKv`, a
//! reference backend adapter over `pickledb::PickleDb` — the same crate
//! `holo-daemon` uses for its own embedded rollback log
//! (`holo-daemon/src/northbound/db.rs`).

use std::path::{Path, PathBuf};

use pickledb::{PickleDb, PickleDbDumpPolicy, SerializationMethod};
use regex::Regex;

use crate::config::{Config, DumpPolicy};
use crate::error::{Error, Result};

/// Storage contract consumed by [`crate::facade::DatastoreFacade`] and
/// [`crate::mutation::MutationEngine`]. A value of `None` represents a key
/// with no body text (an empty-bodied intermediate element).
pub trait Kv {
    /// Returns every `(key, value)` pair whose key matches `pattern`.
    /// Ordering is not required (spec.md §6).
    fn scan(&self, pattern: &Regex) -> Result<Vec<(String, Option<String>)>>;
    fn get(&self, key: &str) -> Result<Option<Option<String>>>;
    fn set(&mut self, key: &str, value: Option<&str>) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
    fn exists(&self, key: &str) -> Result<bool>;
}

/// `PickleKv`: one `PickleDb` file per named datastore, under
/// `Config::database_dir`, opened with `SerializationMethod::Json` — values
/// are UTF-8 leaf text, not the opaque binary records the teacher's own
/// `Transaction` log stores, so JSON round-trips losslessly while staying
/// human-inspectable on disk.
pub struct PickleKv {
    db: PickleDb,
    path: PathBuf,
}

impl PickleKv {
    /// Opens (creating if absent) the datastore file `<database_dir>/<name>`.
    pub fn open(config: &Config, name: &str) -> Result<PickleKv> {
        let path = Path::new(&config.database_dir).join(format!("{name}.db"));
        let dump_policy = match config.dump_policy {
            DumpPolicy::AutoDump => PickleDbDumpPolicy::AutoDump,
            DumpPolicy::NeverDump => PickleDbDumpPolicy::NeverDump,
        };

        let db = if path.exists() {
            PickleDb::load(&path, dump_policy, SerializationMethod::Json)
                .map_err(|e| Error::KvInitFailed(e.to_string()))?
        } else {
            PickleDb::new(&path, dump_policy, SerializationMethod::Json)
        };

        Ok(PickleKv { db, path })
    }

    /// `KV.unlink`: deletes the backing file and reopens an empty store, as
    /// the facade's `replace` does before proceeding as `merge`
    /// (spec.md §4.5).
    pub fn unlink_and_reinit(&mut self, config: &Config) -> Result<()> {
        let _ = std::fs::remove_file(&self.path);
        let dump_policy = match config.dump_policy {
            DumpPolicy::AutoDump => PickleDbDumpPolicy::AutoDump,
            DumpPolicy::NeverDump => PickleDbDumpPolicy::NeverDump,
        };
        self.db = PickleDb::new(&self.path, dump_policy, SerializationMethod::Json);
        Ok(())
    }
}

impl Kv for PickleKv {
    fn scan(&self, pattern: &Regex) -> Result<Vec<(String, Option<String>)>> {
        Ok(self
            .db
            .iter()
            .filter(|entry| pattern.is_match(entry.get_key()))
            .map(|entry| {
                let key = entry.get_key().to_owned();
                let value = entry.get_value::<Option<String>>().unwrap_or(None);
                (key, value)
            })
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<Option<String>>> {
        Ok(self.db.get::<Option<String>>(key))
    }

    fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        self.db
            .set(key, &value.map(|s| s.to_owned()))
            .map_err(|e| Error::KvWriteFailed(e.to_string()))
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.db
            .rem(key)
            .map(|_| ())
            .map_err(|e| Error::KvWriteFailed(e.to_string()))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.db.exists(key))
    }
}
