// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the publish pipeline.
//!
//! Real git repositories (working tree plus a local bare remote) with
//! shell scripts standing in for `ogr2ogr` and `psql`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use sensum_publish::config::Config;
use sensum_publish::task::pipeline::Pipeline;
use sensum_publish::task::{OutputFiles, Step, StepStatus};
use tempfile::TempDir;

const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[]}"#;

struct Fixture {
    _dir: TempDir,
    repo: PathBuf,
    remote: PathBuf,
    bin: PathBuf,
}

fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Working tree on `master` with `origin` pointing at a bare repository.
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("release");
    let remote = dir.path().join("remote.git");
    let bin = dir.path().join("bin");
    for path in [&repo, &remote, &bin] {
        std::fs::create_dir(path).unwrap();
    }

    git(&remote, &["init", "--quiet", "--bare"]);
    git(&repo, &["init", "--quiet"]);
    git(&repo, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    git(&repo, &["config", "user.email", "release@example.com"]);
    git(&repo, &["config", "user.name", "Release Bot"]);
    git(&repo, &["config", "commit.gpgsign", "false"]);
    git(
        &repo,
        &["remote", "add", "origin", remote.to_str().unwrap()],
    );

    // ogr2ogr -f GeoJSON <out> ...
    write_script(
        &bin.join("ogr2ogr"),
        &format!("printf '%s' '{GEOJSON}' > \"$3\""),
    );
    write_script(
        &bin.join("psql"),
        "echo 'psql: error: connection to server failed' >&2\nexit 2",
    );

    Fixture {
        _dir: dir,
        repo,
        remote,
        bin,
    }
}

/// Replaces the failing `psql` with one that writes the `\COPY` target.
fn install_working_psql(fixture: &Fixture) {
    write_script(
        &fixture.bin.join("psql"),
        r#"while [ $# -gt 0 ]; do
    [ "$1" = -c ] && cmd=$2
    shift
done
case "$cmd" in
    *"DELIMITER ',' CSV HEADER;"*) ;;
    *) echo "unexpected command: $cmd" >&2; exit 3 ;;
esac
target=$(printf '%s\n' "$cmd" | sed -n "s/.* TO '\([^']*\)' .*/\1/p")
printf 'id,name\n1,alpha\n2,beta\n' > "$target""#,
    );
}

fn config(fixture: &Fixture) -> Config {
    let mut config = Config::default();
    config.repo.path = fixture.repo.clone();
    config.tools.ogr2ogr = fixture.bin.join("ogr2ogr");
    config.tools.psql = fixture.bin.join("psql");
    config
}

#[tokio::test]
async fn publish_twice_creates_two_commits() {
    let fixture = fixture();
    let config = Arc::new(config(&fixture));

    for _ in 0..2 {
        let report = Pipeline::new(Arc::clone(&config)).run().await;
        assert!(!report.is_aborted(), "{:?}", report.format_summary());
        assert_eq!(
            report.get(Step::Push).unwrap().status,
            StepStatus::Succeeded
        );
    }

    assert_eq!(git(&fixture.repo, &["rev-list", "--count", "HEAD"]), "2");
    assert_eq!(
        git(&fixture.remote, &["rev-list", "--count", "master"]),
        "2"
    );
    // unchanged data: the second release has an empty diff
    assert_eq!(git(&fixture.repo, &["diff", "--stat", "HEAD~1", "HEAD"]), "");
    assert_eq!(
        git(&fixture.repo, &["log", "-1", "--format=%s"]),
        "new sensum_db_scenario release"
    );
    assert_eq!(
        git(&fixture.repo, &["ls-files"]),
        "v_resolution1_data.geojson"
    );
    assert_eq!(
        git(&fixture.repo, &["rev-parse", "--abbrev-ref", "master@{upstream}"]),
        "origin/master"
    );
}

#[tokio::test]
async fn export_failures_are_ignored() {
    let fixture = fixture();
    let files = OutputFiles::new(&fixture.repo);
    std::fs::write(&files.geojson, "stale").unwrap();
    std::fs::write(&files.csv, "stale").unwrap();

    let report = Pipeline::new(Arc::new(config(&fixture))).run().await;

    assert!(!report.is_aborted());
    let tabular = report.get(Step::TabularExport).unwrap();
    assert_eq!(
        tabular.status,
        StepStatus::Failed {
            exit_code: Some(2),
            message: "psql: error: connection to server failed".to_string(),
        }
    );
    // cleanup removed the stale CSV and the failed export did not recreate it
    assert!(!files.csv.exists());
    assert_eq!(std::fs::read_to_string(&files.geojson).unwrap(), GEOJSON);
}

#[tokio::test]
async fn missing_repository_fails_git_steps_only() {
    let fixture = fixture();
    let mut config = config(&fixture);
    config.repo.path = fixture.repo.join("does-not-exist");

    let report = Pipeline::new(Arc::new(config)).run().await;

    assert_eq!(report.aborted_at, Some(Step::Stage));
    assert_eq!(
        report.get(Step::Cleanup).unwrap().status,
        StepStatus::Succeeded
    );
    // exports ran (and failed on their own) before any git step
    assert!(report.get(Step::SpatialExport).unwrap().status.is_failed());
    assert!(report.get(Step::Stage).unwrap().status.is_failed());
    assert_eq!(
        report.get(Step::Commit).unwrap().status,
        StepStatus::Skipped
    );
    assert_eq!(report.get(Step::Push).unwrap().status, StepStatus::Skipped);
}

#[tokio::test]
async fn push_failure_aborts_after_local_commit() {
    let fixture = fixture();
    git(
        &fixture.repo,
        &["remote", "set-url", "origin", "/nonexistent/remote.git"],
    );

    let report = Pipeline::new(Arc::new(config(&fixture))).run().await;

    assert_eq!(report.aborted_at, Some(Step::Push));
    assert_eq!(
        report.get(Step::Commit).unwrap().status,
        StepStatus::Succeeded
    );
    assert_eq!(git(&fixture.repo, &["rev-list", "--count", "HEAD"]), "1");
}

#[tokio::test]
async fn no_push_keeps_remote_untouched() {
    let fixture = fixture();

    let report = Pipeline::new(Arc::new(config(&fixture)))
        .with_push(false)
        .run()
        .await;

    assert!(!report.is_aborted());
    assert_eq!(report.get(Step::Push).unwrap().status, StepStatus::Skipped);
    assert_eq!(git(&fixture.repo, &["rev-list", "--count", "HEAD"]), "1");
    assert_eq!(git(&fixture.remote, &["for-each-ref"]), "");
}

#[tokio::test]
async fn dry_run_leaves_everything_in_place() {
    let fixture = fixture();
    let files = OutputFiles::new(&fixture.repo);
    std::fs::write(&files.geojson, "stale").unwrap();

    let report = Pipeline::new(Arc::new(config(&fixture)))
        .with_dry_run(true)
        .run()
        .await;

    assert!(report.steps.iter().all(|r| r.status == StepStatus::DryRun));
    assert_eq!(std::fs::read_to_string(&files.geojson).unwrap(), "stale");
    let status = Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .current_dir(&fixture.repo)
        .status()
        .unwrap();
    assert!(!status.success(), "dry run must not commit");
}

#[tokio::test]
async fn both_exports_are_committed_and_pushed() {
    let fixture = fixture();
    install_working_psql(&fixture);
    let files = OutputFiles::new(&fixture.repo);

    let report = Pipeline::new(Arc::new(config(&fixture))).run().await;

    assert!(report.failures().next().is_none(), "{:?}", report.format_summary());
    assert_eq!(
        report.get(Step::TabularExport).unwrap().status,
        StepStatus::Succeeded
    );
    let csv = std::fs::read_to_string(&files.csv).unwrap();
    assert_eq!(csv.lines().next(), Some("id,name"));
    assert_eq!(csv.lines().count(), 3);

    let expected = "v_resolution1_data.geojson\nv_resolution1_metadata.csv";
    assert_eq!(git(&fixture.repo, &["ls-files"]), expected);
    assert_eq!(
        git(&fixture.remote, &["ls-tree", "--name-only", "master"]),
        expected
    );
}
