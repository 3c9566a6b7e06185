// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./worktrack.toml` > `~/.config/worktrack/worktrack.toml`
//! > `/etc/worktrack/worktrack.toml`, with environment variable overrides via
//! the `WORKTRACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WorktrackConfig;

/// Config sections that environment variables may address.
const SECTIONS: &[&str] = &["service", "server", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/worktrack/worktrack.toml` (system-wide)
/// 3. `~/.config/worktrack/worktrack.toml` (user XDG config)
/// 4. `./worktrack.toml` (local directory)
/// 5. `WORKTRACK_*` environment variables
pub fn load_config() -> Result<WorktrackConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<WorktrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WorktrackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WorktrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WorktrackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WorktrackConfig::default()))
        .merge(Toml::file("/etc/worktrack/worktrack.toml"))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("worktrack.toml"))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("worktrack/worktrack.toml"))
}

/// Create the environment variable provider.
///
/// Keys are mapped section-first with `map_env_key` rather than
/// `Env::split("_")`, because field names themselves contain underscores:
/// `WORKTRACK_STORAGE_DATABASE_PATH` must become `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("WORKTRACK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
///
/// Names that do not start with a known section are passed through unchanged
/// and will be rejected as unknown top-level keys.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("service_log_level"), "service.log_level");
    }

    #[test]
    fn env_key_without_section_passes_through() {
        assert_eq!(map_env_key("database_path"), "database_path");
        assert_eq!(map_env_key("serverport"), "serverport");
    }
}
