// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for sensum-publish.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults (stock sensum_db release parameters)
//! 2. sensum-publish.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. SENSUM_* env vars
//! 5. --set key=value
//! 6. dedicated CLI flags (--repo, --dry, --log-level)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SENSUM_DATABASE__PASSWORD=secret  → database.password = "secret"
//! SENSUM_REPO__PATH=/srv/release    → repo.path = "/srv/release"
//! SENSUM_SPATIAL__SOURCE_SRS=21781  → spatial.source_srs = 21781
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{DatabaseConfig, GlobalConfig, PublishConfig, RepoConfig, SpatialConfig, ToolsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Database connection.
    pub database: DatabaseConfig,
    /// Spatial reference settings.
    pub spatial: SpatialConfig,
    /// Target repository.
    pub repo: RepoConfig,
    /// Pipeline behavior.
    pub publish: PublishConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sensum_publish::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("sensum-publish.toml")
    ///     .with_env_prefix("SENSUM")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check that the values the pipeline embeds into commands are usable.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for empty identifiers or zero port/SRS values.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        require_non_empty("database", "host", &self.database.host)?;
        require_non_empty("database", "dbname", &self.database.dbname)?;
        require_non_empty("database", "user", &self.database.user)?;
        require_non_empty("repo", "remote", &self.repo.remote)?;
        require_non_empty("repo", "branch", &self.repo.branch)?;

        if self.database.port == 0 {
            return Err(ConfigError::InvalidValue {
                section: "database".to_string(),
                key: "port".to_string(),
                message: "port must be between 1 and 65535".to_string(),
            });
        }
        if self.spatial.source_srs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "spatial".to_string(),
                key: "source_srs".to_string(),
                message: "expected a positive EPSG code".to_string(),
            });
        }
        if self.repo.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "repo".to_string(),
                key: "path".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Sorted by key. The database password is shown as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_database_options(&mut options);
        self.format_repo_options(&mut options);
        self.format_publish_options(&mut options);
        self.format_tools_options(&mut options);
        options.insert(
            "spatial.source_srs".into(),
            self.spatial.source_srs.to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
    }

    fn format_database_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("database.host".into(), self.database.host.clone());
        options.insert("database.port".into(), self.database.port.to_string());
        options.insert("database.dbname".into(), self.database.dbname.clone());
        options.insert("database.user".into(), self.database.user.clone());
        if !self.database.password.is_empty() {
            options.insert("database.password".into(), "[hidden]".into());
        }
    }

    fn format_repo_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("repo.path".into(), self.repo.path.display().to_string());
        options.insert("repo.remote".into(), self.repo.remote.clone());
        options.insert("repo.branch".into(), self.repo.branch.clone());
    }

    fn format_publish_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "publish.allow_empty_commit".into(),
            self.publish.allow_empty_commit.to_string(),
        );
        options.insert(
            "publish.abort_on_git_failure".into(),
            self.publish.abort_on_git_failure.to_string(),
        );
        options.insert(
            "publish.elevated_cleanup".into(),
            self.publish.elevated_cleanup.to_string(),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "tools.ogr2ogr".into(),
            self.tools.ogr2ogr.display().to_string(),
        );
        options.insert("tools.psql".into(), self.tools.psql.display().to_string());
        options.insert("tools.git".into(), self.tools.git.display().to_string());
        options.insert("tools.sudo".into(), self.tools.sudo.display().to_string());
    }
}

fn require_non_empty(section: &str, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}
