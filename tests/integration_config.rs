// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files and layering.

use std::path::PathBuf;

use sensum_publish::config::Config;
use sensum_publish::config::loader::ConfigLoader;

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensum-publish.toml");
    std::fs::write(
        &path,
        r#"
[database]
host = "gis.example.org"
dbname = "sensum_db_bishkek"
password = "s3cret"

[spatial]
source_srs = 32643

[repo]
path = "/srv/sensum-release"
remote = "github"

[publish]
allow_empty_commit = false
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.database.host, "gis.example.org");
    assert_eq!(config.database.dbname, "sensum_db_bishkek");
    assert_eq!(config.spatial.source_srs, 32643);
    assert_eq!(config.repo.path, PathBuf::from("/srv/sensum-release"));
    assert_eq!(config.repo.remote, "github");
    assert_eq!(config.repo.branch, "master");
    assert!(!config.publish.allow_empty_commit);
    assert!(config.publish.abort_on_git_failure);
}

#[test]
fn config_missing_required_file_fails() {
    let result = Config::from_file("/nonexistent/sensum-publish.toml");
    assert!(result.is_err());
}

#[test]
fn config_invalid_toml_fails() {
    assert!(Config::parse("[database\nhost = 1").is_err());
}

#[test]
fn config_wrong_type_fails() {
    let result = Config::parse(
        r#"
[database]
port = "not a port"
"#,
    );
    assert!(result.is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.toml");
    let local = dir.path().join("local.toml");
    std::fs::write(&base, "[database]\nhost = \"base\"\nuser = \"sensum\"\n").unwrap();
    std::fs::write(&local, "[database]\nhost = \"local\"\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file_optional(&local)
        .add_toml_file_optional(dir.path().join("absent.toml"));
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.database.host, "local");
    assert_eq!(config.database.user, "sensum");
}

#[test]
fn config_env_overrides_files() {
    // unique prefix so parallel tests never see these variables
    // SAFETY: no other test reads or writes SENSUMITEST_* variables
    unsafe {
        std::env::set_var("SENSUMITEST_DATABASE__PASSWORD", "from-env");
        std::env::set_var("SENSUMITEST_SPATIAL__SOURCE_SRS", "21781");
    }

    let config = ConfigLoader::new()
        .add_toml_str("[database]\npassword = \"from-file\"\n")
        .with_env_prefix("SENSUMITEST")
        .build()
        .unwrap();

    assert_eq!(config.database.password, "from-env");
    assert_eq!(config.spatial.source_srs, 21781);
}

#[test]
fn config_set_overrides_env() {
    // SAFETY: no other test reads or writes SENSUMSTEST_* variables
    unsafe {
        std::env::set_var("SENSUMSTEST_REPO__BRANCH", "from-env");
    }

    let config = ConfigLoader::new()
        .with_env_prefix("SENSUMSTEST")
        .set_assignment("repo.branch=from-set")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.repo.branch, "from-set");
}

#[test]
fn config_validation_runs_after_layering() {
    let result = ConfigLoader::new()
        .add_toml_str("[repo]\nremote = \"origin\"\n")
        .set_assignment("repo.remote=")
        .unwrap()
        .build();

    let err = result.unwrap_err();
    assert!(
        format!("{err:#}").contains("missing required config key 'remote'"),
        "unexpected error: {err:#}"
    );
}
