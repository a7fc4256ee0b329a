// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git tool for the repository steps.
//!
//! ```text
//! GitTool
//! Operations: Stage | Commit | Push
//!   Stage   git add --all .
//!   Commit  git commit -m "new <dbname> release" [--allow-empty]
//!   Push    git push --set-upstream <remote> <branch>
//! cwd = repository path, prompts disabled
//! ```
//!
//! All writes go through the git executable via
//! `ProcessBuilder::run_with_cancellation()`, so hooks, credential helpers,
//! and SSH configuration behave as on the command line. For read-only
//! queries use `crate::git`.

use std::path::PathBuf;

use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext, step_process};
use crate::config::Config;
use crate::core::process::builder::ProcessOutput;
use crate::error::Result;
use crate::task::commit_message;

/// Git operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOperation {
    /// Stage every change in the working tree.
    Stage,
    /// Commit the staged changes.
    Commit,
    /// Push to the configured remote with upstream tracking.
    Push,
}

impl GitOperation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stage => "add",
            Self::Commit => "commit",
            Self::Push => "push",
        }
    }
}

/// Runs one git operation inside the release repository.
#[derive(Debug, Clone)]
pub struct GitTool {
    program: PathBuf,
    repo: PathBuf,
    remote: String,
    branch: String,
    message: String,
    allow_empty: bool,
    operation: GitOperation,
}

impl GitTool {
    #[must_use]
    pub fn new(config: &Config, operation: GitOperation) -> Self {
        Self {
            program: config.tools.git.clone(),
            repo: config.repo.path.clone(),
            remote: config.repo.remote.clone(),
            branch: config.repo.branch.clone(),
            message: commit_message(&config.database.dbname),
            allow_empty: config.publish.allow_empty_commit,
            operation,
        }
    }

    #[must_use]
    pub const fn operation(&self) -> GitOperation {
        self.operation
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = match self.operation {
            GitOperation::Stage => vec!["add".into(), "--all".into(), ".".into()],
            GitOperation::Commit => vec!["commit".into(), "-m".into(), self.message.clone()],
            GitOperation::Push => vec![
                "push".into(),
                "--set-upstream".into(),
                self.remote.clone(),
                self.branch.clone(),
            ],
        };
        if self.operation == GitOperation::Commit && self.allow_empty {
            args.push("--allow-empty".into());
        }
        args
    }

    async fn do_run(&self, ctx: &ToolContext) -> Result<ProcessOutput> {
        if ctx.is_dry_run() {
            info!(
                repo = %self.repo.display(),
                command = %self.args().join(" "),
                "[dry-run] Would run git {}",
                self.operation.name()
            );
            return Ok(ProcessOutput::not_run());
        }

        let builder = step_process(&self.program, "git")?
            .name(format!("git {}", self.operation.name()))
            .args(self.args())
            .cwd(&self.repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never");

        debug!(repo = %self.repo.display(), operation = self.operation.name(), "Running git");

        builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await
    }
}

impl Tool for GitTool {
    fn name(&self) -> &'static str {
        "git"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.do_run(ctx))
    }
}

#[cfg(test)]
mod tests;
