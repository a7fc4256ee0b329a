// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for sensum-publish.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   global    dry, log levels, log file
//!   database  host, port, dbname, user, password
//!   spatial   source_srs
//!   repo      path, remote, branch
//!   publish   allow_empty_commit, abort_on_git_failure, elevated_cleanup
//!   tools     ogr2ogr, psql, git, sudo
//! ```
//!
//! Defaults match the stock sensum_db release parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log what would run without touching files, the database, or git.
    pub dry: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// `PostgreSQL` connection parameters shared by `ogr2ogr` and `psql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    /// Empty means "let libpq find it" (`.pgpass`, trust auth).
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "sensum_db_scenario".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

/// Spatial reference settings for the geospatial export.
///
/// Only the source SRS is configurable. The target is always
/// [`TARGET_SRS`](crate::task::TARGET_SRS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpatialConfig {
    /// EPSG code of the geometries stored in the data view.
    pub source_srs: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self { source_srs: 4326 }
    }
}

/// Local git working tree that receives the exported files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Working tree path. Should already have `remote` configured.
    pub path: PathBuf,
    /// Remote to push to.
    pub remote: String,
    /// Branch to push.
    pub branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            remote: "origin".to_string(),
            branch: "master".to_string(),
        }
    }
}

/// Pipeline behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Commit even when the exports did not change anything.
    pub allow_empty_commit: bool,
    /// Stop at the first failing git step and exit non-zero.
    pub abort_on_git_failure: bool,
    /// Delete stale outputs with `sudo rm -f` instead of in-process.
    pub elevated_cleanup: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            allow_empty_commit: true,
            abort_on_git_failure: true,
            elevated_cleanup: false,
        }
    }
}

/// External executables. Bare names are looked up in `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ogr2ogr: PathBuf,
    pub psql: PathBuf,
    pub git: PathBuf,
    pub sudo: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ogr2ogr: PathBuf::from("ogr2ogr"),
            psql: PathBuf::from("psql"),
            git: PathBuf::from("git"),
            sudo: PathBuf::from("sudo"),
        }
    }
}
