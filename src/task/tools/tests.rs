// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{ToolContext, step_process};
use crate::config::Config;

#[test]
fn test_tool_context() {
    let token = CancellationToken::new();
    let ctx = ToolContext::new(Arc::new(Config::default()), token.clone(), true);

    assert!(ctx.is_dry_run());
    assert!(!ctx.is_cancelled());
    token.cancel();
    assert!(ctx.is_cancelled());
    assert_eq!(ctx.config().repo.branch, "master");
}

#[cfg(unix)]
#[tokio::test]
async fn test_step_process_returns_failed_output() {
    let output = step_process(Path::new("sh"), "export")
        .unwrap()
        .args(["-c", "echo 'ERROR: relation does not exist' >&2; exit 1"])
        .run()
        .await
        .expect("non-zero exit is returned as output");

    assert_eq!(output.exit_code(), 1);
    insta::assert_snapshot!(output.stderr(), @"ERROR: relation does not exist");
}

#[test]
fn test_step_process_unknown_program() {
    let err = step_process(Path::new("sensum-missing-tool"), "export").unwrap_err();
    insta::assert_snapshot!(format!("{err:#}"), @"cannot run export: executable not found: 'sensum-missing-tool' (not in PATH)");
}
