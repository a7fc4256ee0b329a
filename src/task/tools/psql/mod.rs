// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `psql` tool for the tabular export.
//!
//! ```text
//! psql -U <user> -p <port> -d <dbname> -v ON_ERROR_STOP=1
//!      -c "\COPY (SELECT * FROM <view>) TO '<out>' DELIMITER ',' CSV HEADER;"
//! ```
//!
//! `\COPY` runs client-side, so the file is written with the caller's
//! permissions rather than the server's. The password travels in
//! `PGPASSWORD`, never on the command line.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext, step_process};
use crate::config::Config;
use crate::core::process::builder::ProcessOutput;
use crate::error::Result;
use crate::task::{CSV_DELIMITER, METADATA_VIEW};

/// Exports the metadata view to a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct PsqlTool {
    program: PathBuf,
    output: PathBuf,
    user: String,
    port: u16,
    dbname: String,
    password: String,
}

impl PsqlTool {
    #[must_use]
    pub fn new(config: &Config, output: impl AsRef<Path>) -> Self {
        Self {
            program: config.tools.psql.clone(),
            output: output.as_ref().to_path_buf(),
            user: config.database.user.clone(),
            port: config.database.port,
            dbname: config.database.dbname.clone(),
            password: config.database.password.clone(),
        }
    }

    /// The client-side copy meta-command.
    #[must_use]
    pub fn copy_command(&self) -> String {
        format!(
            "\\COPY (SELECT * FROM {METADATA_VIEW}) TO {} DELIMITER '{CSV_DELIMITER}' CSV HEADER;",
            quote_literal(&self.output.display().to_string())
        )
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "-U".to_string(),
            self.user.clone(),
            "-p".to_string(),
            self.port.to_string(),
            "-d".to_string(),
            self.dbname.clone(),
            "-v".to_string(),
            "ON_ERROR_STOP=1".to_string(),
            "-c".to_string(),
            self.copy_command(),
        ]
    }

    async fn do_export(&self, ctx: &ToolContext) -> Result<ProcessOutput> {
        if ctx.is_dry_run() {
            info!(
                output = %self.output.display(),
                view = METADATA_VIEW,
                "[dry-run] Would export metadata view to CSV"
            );
            return Ok(ProcessOutput::not_run());
        }

        let mut builder = step_process(&self.program, "psql")?.args(self.args());
        if !self.password.is_empty() {
            builder = builder.env("PGPASSWORD", self.password.as_str());
        }

        debug!(output = %self.output.display(), view = METADATA_VIEW, "Exporting metadata view");

        builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await
    }
}

impl Tool for PsqlTool {
    fn name(&self) -> &'static str {
        "psql"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.do_export(ctx))
    }
}

/// Single-quotes a string literal, doubling embedded quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
