// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the worktrack configuration system.

use worktrack_config::diagnostic::{suggest_key, ConfigError};
use worktrack_config::model::WorktrackConfig;
use worktrack_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_worktrack_config() {
    let toml = r#"
[service]
name = "dispatch"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9100

[storage]
database_path = "/tmp/worktrack-test.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "dispatch");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.storage.database_path, "/tmp/worktrack-test.db");
    assert!(!config.storage.wal_mode);
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    let defaults = WorktrackConfig::default();
    assert_eq!(config.service.name, "worktrack");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.storage.database_path, defaults.storage.database_path);
    assert!(config.storage.wal_mode);
}

/// Partial sections keep defaults for the omitted keys.
#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[server]\nport = 8088\n").expect("valid");
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "127.0.0.1");
}

/// Unknown field in [server] section produces an error naming the key.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
prot = 9000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Diagnostics suggest the closest valid key.
#[test]
fn load_and_validate_suggests_typo_fix() {
    let toml = r#"
[storage]
database_pth = "/tmp/x.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "database_pth");
            assert_eq!(suggestion.as_deref(), Some("database_path"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value types are reported as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected an InvalidType error, got {errors:?}"
    );
}

/// Semantically invalid values pass deserialization but fail validation.
#[test]
fn validation_rejects_port_zero() {
    let errors = load_and_validate_str("[server]\nport = 0\n").expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("server.port")))
    );
}

#[test]
fn validation_rejects_unknown_log_level() {
    let errors =
        load_and_validate_str("[service]\nlog_level = \"chatty\"\n").expect_err("should fail");
    assert!(errors[0].to_string().contains("log_level"));
}

/// Loading from a file path reads the file contents.
#[test]
fn load_from_path_reads_file() {
    let dir = std::env::temp_dir().join(format!("worktrack-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("worktrack.toml");
    std::fs::write(&path, "[server]\nport = 9300\n").expect("write config");

    let config = load_config_from_path(&path).expect("file config should load");
    assert_eq!(config.server.port, 9300);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn suggest_key_exported() {
    assert_eq!(suggest_key("hots", &["host", "port"]), Some("host".to_string()));
}
