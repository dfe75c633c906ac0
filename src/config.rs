//
// SPDX-License-Identifier: MIT
//

use serde::Deserialize;
use tracing::warn;

/// Deployment configuration for the reference `KV` backend.
///
/// This configures only the embedded key-value store used to back named
/// datastores (`running`, `candidate`, `startup`, ...); it has no bearing
/// on YANG/XML semantics, which are a property of the schema and of the
/// operation argument passed to the facade.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one file per named datastore.
    pub database_dir: String,
    pub dump_policy: DumpPolicy,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DumpPolicy {
    /// Flush to disk after every write.
    #[default]
    AutoDump,
    /// Never flush automatically; caller is responsible for `Kv::sync`.
    NeverDump,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/yangdb.toml";

    pub fn load(config_file: Option<&str>) -> Config {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => match toml::from_str(&config_str) {
                Ok(config) => config,
                Err(error) => {
                    warn!(%error, path = %config_file, "failed to parse configuration file");
                    Config::default()
                }
            },
            Err(error) => {
                warn!(%error, path = %config_file, "failed to load configuration file, falling back to defaults");
                Config::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            database_dir: "/var/opt/yangdb".to_owned(),
            dump_policy: DumpPolicy::default(),
        }
    }
}
