// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Removal of the previous run's outputs.
//!
//! ```text
//! for each output:
//!   absent  -> nothing to do
//!   present -> remove_file (in-process)
//!              or `sudo rm -f -- <paths>` when elevated
//! ```
//!
//! A file that is already gone is never an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::process::builder::ProcessOutput;
use crate::error::{FsError, Result};
use crate::task::tools::{Tool, ToolContext, step_process};

/// Deletes the given files if they exist.
#[derive(Debug, Clone)]
pub struct CleanupTool {
    paths: Vec<PathBuf>,
    elevated: bool,
    sudo: PathBuf,
}

impl CleanupTool {
    #[must_use]
    pub fn new<I, P>(config: &Config, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            elevated: config.publish.elevated_cleanup,
            sudo: config.tools.sudo.clone(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    async fn existing_paths(&self) -> Vec<&Path> {
        let mut existing = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                existing.push(path.as_path());
            } else {
                debug!(path = %path.display(), "Nothing to delete");
            }
        }
        existing
    }

    async fn do_cleanup(&self, ctx: &ToolContext) -> Result<ProcessOutput> {
        let existing = self.existing_paths().await;
        if existing.is_empty() {
            return Ok(ProcessOutput::not_run());
        }

        if ctx.is_dry_run() {
            for path in &existing {
                info!(
                    path = %path.display(),
                    elevated = self.elevated,
                    "[dry-run] Would delete previous output"
                );
            }
            return Ok(ProcessOutput::not_run());
        }

        if self.elevated {
            return step_process(&self.sudo, "sudo rm")?
                .args(["rm", "-f", "--"])
                .args(&existing)
                .run_with_cancellation(ctx.cancel_token().clone())
                .await;
        }

        let mut first_error = None;
        for path in existing {
            match remove_output(path).await {
                Ok(()) => info!(path = %path.display(), "Deleted previous output"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not delete previous output");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(ProcessOutput::not_run()),
        }
    }
}

impl Tool for CleanupTool {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.do_cleanup(ctx))
    }
}

/// Removes one file; a file that vanished in the meantime counts as removed.
async fn remove_output(path: &Path) -> std::result::Result<(), FsError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FsError::IoError {
            path: path.display().to_string(),
            source,
        }),
    }
}
