// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Records the `[dry-run]` lines steps log in place of acting.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use anyhow::{Result, ensure};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

use super::{Tool, ToolContext};

const DRY_RUN_PREFIX: &str = "[dry-run]";

#[derive(Default)]
struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

#[derive(Clone, Default)]
struct DryRunRecorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for DryRunRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.0
            && message.starts_with(DRY_RUN_PREFIX)
            && let Ok(mut lines) = self.lines.lock()
        {
            lines.push(message);
        }
    }
}

/// Awaits `fut` and returns its output with the dry-run messages logged
/// meanwhile, in order.
pub(crate) async fn record_dry_run<F: Future>(fut: F) -> (F::Output, Vec<String>) {
    let recorder = DryRunRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());

    let output = {
        let _guard = tracing::subscriber::set_default(subscriber);
        fut.await
    };

    let lines = recorder
        .lines
        .lock()
        .map(|lines| lines.clone())
        .unwrap_or_default();
    (output, lines)
}

/// Runs `tool` in the dry-run context `ctx` and returns its dry-run lines.
///
/// Fails if the context is not a dry run or the tool reports anything but
/// a clean, not-run result.
pub(crate) async fn dry_run_lines(tool: &dyn Tool, ctx: &ToolContext) -> Result<Vec<String>> {
    ensure!(ctx.is_dry_run(), "context for {} is not a dry run", tool.name());
    let (output, lines) = record_dry_run(tool.run(ctx)).await;
    let output = output?;
    ensure!(
        output.success() && output.stdout().is_empty() && output.stderr().is_empty(),
        "dry run of {} produced process output",
        tool.name()
    );
    Ok(lines)
}
