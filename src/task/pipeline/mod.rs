// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sequential publish pipeline.
//!
//! ```text
//! Pipeline::new(config)
//!   .with_dry_run()  .with_cancel_token()  .with_push()
//!   .run().await
//!       Cleanup -> SpatialExport -> TabularExport   (failures ignored)
//!       Stage -> Commit -> Push                     (abort on failure)
//!       cancellation: current step failed, rest skipped
//!   --> PublishReport
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::git::query::{current_branch, has_uncommitted_changes, is_git_repo};

use super::cleanup::CleanupTool;
use super::tools::git::{GitOperation, GitTool};
use super::tools::ogr2ogr::Ogr2OgrTool;
use super::tools::psql::PsqlTool;
use super::tools::{Tool, ToolContext};
use super::{FailurePolicy, OutputFiles, PublishReport, Step, StepReport, StepStatus};

/// Runs the six publish steps in order.
pub struct Pipeline {
    /// Shared configuration.
    config: Arc<Config>,

    /// Cancellation token for cooperative cancellation.
    cancel_token: CancellationToken,

    /// Whether to run in dry-run mode.
    dry_run: bool,

    /// Whether the push step runs.
    push: bool,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        let dry_run = config.global.dry;
        Self {
            config,
            cancel_token: CancellationToken::new(),
            dry_run,
            push: true,
        }
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Uses an externally owned cancellation token (Ctrl+C handler).
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Enables or disables the push step.
    #[must_use]
    pub const fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    /// Returns whether dry-run mode is enabled.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the cancellation token for sharing with signal handlers.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Triggers cancellation of the running step.
    pub fn interrupt(&self) {
        info!("Interrupting publish");
        self.cancel_token.cancel();
    }

    /// Failure policy of a step under the current configuration.
    #[must_use]
    pub fn policy(&self, step: Step) -> FailurePolicy {
        if step.is_git() && self.config.publish.abort_on_git_failure {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Ignore
        }
    }

    /// Runs every step and reports each outcome.
    ///
    /// Failures never surface as `Err`: they are recorded in the report,
    /// and [`PublishReport::aborted_at`] names the step that stopped the run.
    pub async fn run(&self) -> PublishReport {
        let ctx = ToolContext::new(
            Arc::clone(&self.config),
            self.cancel_token.clone(),
            self.dry_run,
        );
        let files = OutputFiles::new(&self.config.repo.path);
        let mut report = PublishReport::default();

        info!(
            dbname = %self.config.database.dbname,
            repo = %self.config.repo.path.display(),
            dry_run = self.dry_run,
            "Publishing release"
        );

        for &step in Step::all() {
            if report.aborted_at.is_some() {
                report.steps.push(StepReport::skipped(step));
                continue;
            }
            if self.cancel_token.is_cancelled() {
                warn!(step = %step, "Cancelled before step started");
                report.aborted_at = Some(step);
                report.steps.push(StepReport::skipped(step));
                continue;
            }
            if step == Step::Push && !self.push {
                info!(step = %step, "Push disabled, skipping");
                report.steps.push(StepReport::skipped(step));
                continue;
            }
            if step == Step::Stage {
                self.inspect_repository();
            }

            let step_report = self.run_step(step, &ctx, &files).await;
            let abort = self.log_outcome(&step_report);
            if abort {
                report.aborted_at = Some(step);
            }
            report.steps.push(step_report);
        }

        report
    }

    fn tool_for(&self, step: Step, files: &OutputFiles) -> Box<dyn Tool> {
        let config = &self.config;
        match step {
            Step::Cleanup => Box::new(CleanupTool::new(config, files.all())),
            Step::SpatialExport => Box::new(Ogr2OgrTool::new(config, &files.geojson)),
            Step::TabularExport => Box::new(PsqlTool::new(config, &files.csv)),
            Step::Stage => Box::new(GitTool::new(config, GitOperation::Stage)),
            Step::Commit => Box::new(GitTool::new(config, GitOperation::Commit)),
            Step::Push => Box::new(GitTool::new(config, GitOperation::Push)),
        }
    }

    async fn run_step(&self, step: Step, ctx: &ToolContext, files: &OutputFiles) -> StepReport {
        let tool = self.tool_for(step, files);
        debug!(step = %step, tool = tool.name(), "Running step");

        match tool.run(ctx).await {
            Ok(output) => StepReport::from_output(step, output, self.dry_run),
            Err(e) => StepReport::from_error(step, &e),
        }
    }

    /// Logs a step outcome and returns whether the run must stop.
    fn log_outcome(&self, report: &StepReport) -> bool {
        let step = report.step;
        match &report.status {
            StepStatus::Succeeded => {
                info!(step = %step, exit_code = report.output.exit_code(), "Step completed");
                false
            }
            StepStatus::DryRun => {
                info!(step = %step, "Step completed (dry run)");
                false
            }
            StepStatus::Skipped => false,
            StepStatus::Failed { exit_code, message } => {
                let interrupted = report.output.is_interrupted() || self.cancel_token.is_cancelled();
                if interrupted || self.policy(step) == FailurePolicy::Abort {
                    error!(step = %step, exit_code = ?exit_code, error = %message, "Step failed, aborting");
                    true
                } else {
                    warn!(step = %step, exit_code = ?exit_code, error = %message, "Step failed, continuing");
                    false
                }
            }
        }
    }

    /// Logs what gix sees in the repository before git runs.
    fn inspect_repository(&self) {
        let repo = &self.config.repo.path;
        if !is_git_repo(repo) {
            warn!(repo = %repo.display(), "Not a git repository, git steps will fail");
            return;
        }

        match has_uncommitted_changes(repo) {
            Ok(changed) => debug!(repo = %repo.display(), changed, "Working tree status"),
            Err(e) => debug!(repo = %repo.display(), error = %e, "Could not check for changes"),
        }

        match current_branch(repo) {
            Ok(Some(branch)) if branch != self.config.repo.branch => warn!(
                current = %branch,
                configured = %self.config.repo.branch,
                "Checked-out branch differs from the branch being pushed"
            ),
            Ok(None) => warn!(repo = %repo.display(), "HEAD is detached"),
            Ok(Some(_)) => {}
            Err(e) => debug!(repo = %repo.display(), error = %e, "Could not resolve HEAD"),
        }
    }
}
