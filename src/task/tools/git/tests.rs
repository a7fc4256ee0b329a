// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{GitOperation, GitTool};
use crate::config::Config;
use crate::task::tools::test_utils::dry_run_lines;
use crate::task::tools::{Tool, ToolContext};

fn args(config: &Config, operation: GitOperation) -> String {
    GitTool::new(config, operation).args().join(" ")
}

#[test]
fn test_git_tool_args() {
    let config = Config::default();
    insta::assert_snapshot!(args(&config, GitOperation::Stage), @"add --all .");
    insta::assert_snapshot!(args(&config, GitOperation::Commit), @"commit -m new sensum_db_scenario release --allow-empty");
    insta::assert_snapshot!(args(&config, GitOperation::Push), @"push --set-upstream origin master");
}

#[test]
fn test_commit_without_allow_empty() {
    let mut config = Config::default();
    config.publish.allow_empty_commit = false;
    config.database.dbname = "sensum_db_kathmandu".to_string();

    let tool = GitTool::new(&config, GitOperation::Commit);
    assert_eq!(
        tool.args(),
        ["commit", "-m", "new sensum_db_kathmandu release"]
    );
}

#[test]
fn test_push_uses_configured_remote() {
    let mut config = Config::default();
    config.repo.remote = "upstream".to_string();
    config.repo.branch = "main".to_string();
    insta::assert_snapshot!(args(&config, GitOperation::Push), @"push --set-upstream upstream main");
}

#[test]
fn test_git_tool_name() {
    let tool = GitTool::new(&Config::default(), GitOperation::Stage);
    assert_eq!(tool.name(), "git");
    assert_eq!(tool.operation(), GitOperation::Stage);
}

#[tokio::test]
async fn test_dry_run_logs() {
    let mut config = Config::default();
    config.tools.git = "/nonexistent/git".into();
    let ctx = ToolContext::new(Arc::new(config), CancellationToken::new(), true);

    let mut lines = Vec::new();
    for op in [GitOperation::Stage, GitOperation::Commit, GitOperation::Push] {
        lines.extend(dry_run_lines(&GitTool::new(ctx.config(), op), &ctx).await.unwrap());
    }
    insta::assert_snapshot!(lines.join("\n"), @r"
    [dry-run] Would run git add
    [dry-run] Would run git commit
    [dry-run] Would run git push
    ");
}

#[cfg(unix)]
#[tokio::test]
async fn test_stage_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.repo.path = dir.path().to_path_buf();
    let ctx = ToolContext::new(Arc::new(config), CancellationToken::new(), false);

    let output = GitTool::new(ctx.config(), GitOperation::Stage)
        .run(&ctx)
        .await
        .expect("git should be installed");

    assert!(!output.success());
    assert!(output.stderr().contains("not a git repository"), "{}", output.stderr());
}
