// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GDAL `ogr2ogr` tool for the spatial export.
//!
//! ```text
//! ogr2ogr -f GeoJSON <out>
//!         -s_srs EPSG:<source> -t_srs EPSG:4326
//!         "PG:host=.. port=.. dbname=.. user=.. [password=..]"
//!         object_res1.v_resolution1_data
//! ```
//!
//! The target SRS is fixed; only the source SRS comes from configuration.
//! The connection string is a single argument, so no shell quoting is
//! involved, but values are still quoted the way libpq parses conninfo
//! strings. The password never appears in logged command lines.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext, step_process};
use crate::config::Config;
use crate::config::types::DatabaseConfig;
use crate::core::process::builder::ProcessOutput;
use crate::error::Result;
use crate::task::{DATA_VIEW, TARGET_SRS};

/// Exports the data view to a GeoJSON file.
#[derive(Debug, Clone)]
pub struct Ogr2OgrTool {
    program: PathBuf,
    output: PathBuf,
    source_srs: u32,
    database: DatabaseConfig,
}

impl Ogr2OgrTool {
    #[must_use]
    pub fn new(config: &Config, output: impl AsRef<Path>) -> Self {
        Self {
            program: config.tools.ogr2ogr.clone(),
            output: output.as_ref().to_path_buf(),
            source_srs: config.spatial.source_srs,
            database: config.database.clone(),
        }
    }

    /// The `PG:` datasource naming the database. An empty password is left
    /// out so libpq can fall back to `.pgpass` or `PGPASSWORD`.
    #[must_use]
    pub fn pg_datasource(&self) -> String {
        let db = &self.database;
        let mut conninfo = format!(
            "PG:host={} port={} dbname={} user={}",
            quote_conninfo_value(&db.host),
            db.port,
            quote_conninfo_value(&db.dbname),
            quote_conninfo_value(&db.user),
        );
        if !db.password.is_empty() {
            conninfo.push_str(" password=");
            conninfo.push_str(&quote_conninfo_value(&db.password));
        }
        conninfo
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            "GeoJSON".to_string(),
            self.output.display().to_string(),
            "-s_srs".to_string(),
            format!("EPSG:{}", self.source_srs),
            "-t_srs".to_string(),
            format!("EPSG:{TARGET_SRS}"),
            self.pg_datasource(),
            DATA_VIEW.to_string(),
        ]
    }

    async fn do_export(&self, ctx: &ToolContext) -> Result<ProcessOutput> {
        if ctx.is_dry_run() {
            info!(
                output = %self.output.display(),
                view = DATA_VIEW,
                source_srs = self.source_srs,
                target_srs = TARGET_SRS,
                "[dry-run] Would export data view to GeoJSON"
            );
            return Ok(ProcessOutput::not_run());
        }

        let builder = step_process(&self.program, "ogr2ogr")?
            .args(self.args())
            .redact(self.database.password.as_str());

        debug!(output = %self.output.display(), view = DATA_VIEW, "Exporting data view");

        builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await
    }
}

impl Tool for Ogr2OgrTool {
    fn name(&self) -> &'static str {
        "ogr2ogr"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.do_export(ctx))
    }
}

/// Quotes a conninfo value when libpq would otherwise split or unescape it.
///
/// Values with whitespace, quotes, or backslashes (and empty values) are
/// wrapped in single quotes with `'` and `\` backslash-escaped.
#[must_use]
pub fn quote_conninfo_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
