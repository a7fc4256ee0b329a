// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command implementation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::publish::PublishArgs;
use crate::config::Config;
use crate::error::{PublishError, Result, TaskError};
use crate::task::PublishReport;
use crate::task::pipeline::Pipeline;

/// Main handler for the publish command.
///
/// # Errors
///
/// Returns an error if a step with an abort policy fails or the run is
/// interrupted. Ignored failures only produce warnings.
pub async fn run_publish_command(args: &PublishArgs, config: Config) -> Result<()> {
    let pipeline = Pipeline::new(Arc::new(config)).with_push(!args.no_push);

    let cancel_token = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, interrupting publish...");
            cancel_token.cancel();
        }
    });

    let report = pipeline.run().await;
    for line in report.format_summary() {
        info!("{line}");
    }

    check_report(&report, pipeline.cancel_token().is_cancelled())
}

/// Turns a finished report into the command result.
fn check_report(report: &PublishReport, interrupted: bool) -> Result<()> {
    let Some(step) = report.aborted_at else {
        let failed = report.failures().count();
        if failed == 0 {
            info!("Release published");
        } else {
            warn!(failed, "Release published, some steps failed");
        }
        return Ok(());
    };

    let error = if interrupted {
        TaskError::Interrupted(step.name().to_string())
    } else {
        let message = report
            .get(step)
            .map_or_else(|| "unknown failure".to_string(), |r| r.status.to_string());
        TaskError::StepFailed {
            step: step.name().to_string(),
            message,
        }
    };
    Err(PublishError::from(error).into())
}
