// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tool abstractions for pipeline steps.
//!
//! ```text
//! Step --> ToolContext --> ProcessBuilder --> Tools
//!   ogr2ogr, psql, git
//! ToolContext: cancel token --> run_with_cancellation
//! ```
//!
//! All tools support graceful cancellation via `CancellationToken`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::Result;

pub mod git;
pub mod ogr2ogr;
pub mod psql;

use futures_util::future::BoxFuture;

/// Context provided to tools during execution.
///
/// Contains references to configuration, cancellation tokens, and execution flags.
#[derive(Clone)]
pub struct ToolContext {
    /// Cancellation token for cooperative cancellation.
    cancel_token: CancellationToken,

    /// Whether this is a dry-run execution.
    /// When true, tools should log what they would do without making changes.
    dry_run: bool,

    /// Reference to the configuration.
    config: Arc<Config>,
}

impl ToolContext {
    /// Creates a new `ToolContext`.
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            cancel_token,
            dry_run,
            config,
        }
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Returns a reference to the cancellation token.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Returns whether this is a dry-run execution.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Checks if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Trait for tools that execute external processes.
///
/// Each tool wraps one external invocation. A tool returns the
/// [`ProcessOutput`] even when the process exits non-zero; only failures to
/// start it at all come back as `Err`. Deciding whether a failure matters is
/// the pipeline's job.
///
/// # Implementation Notes
///
/// - Tools should use `ProcessBuilder::run_with_cancellation()` for process execution
/// - Tools should respect `ctx.is_dry_run()` and only log actions without executing
pub trait Tool: Send + Sync {
    /// Returns the name of this tool (e.g., "ogr2ogr", "psql", "git").
    fn name(&self) -> &str;

    /// Executes the tool's operation.
    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<ProcessOutput>>;
}

/// Resolves a configured executable and prepares it for a pipeline step:
/// output captured and logged, non-zero exit returned as output.
pub(crate) fn step_process(program: &Path, step: &str) -> Result<ProcessBuilder> {
    let builder = ProcessBuilder::resolve(program)
        .with_context(|| format!("cannot run {step}"))?
        .name(step)
        .capture_output()
        .flag(ProcessFlags::ALLOW_FAILURE);
    Ok(builder)
}

#[cfg(test)]
pub(crate) mod test_utils;
#[cfg(test)]
mod tests;
