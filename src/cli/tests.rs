// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_parse_no_command_defaults_to_publish() {
    let cli = Cli::try_parse_from(["sensum-publish"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.global.to_config_overrides().is_empty());
}

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["sensum-publish", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_publish_no_push() {
    let cli = Cli::try_parse_from(["sensum-publish", "publish", "--no-push"]).unwrap();
    match cli.command {
        Some(Command::Publish(args)) => assert!(args.no_push),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "sensum-publish",
        "-c",
        "prod.toml",
        "--config",
        "local.toml",
        "-l",
        "4",
        "--dry",
        "-r",
        "/srv/sensum-release",
        "-s",
        "database.host=db.example.org",
        "options",
    ])
    .unwrap();

    assert!(matches!(cli.command, Some(Command::Options)));
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("prod.toml"), PathBuf::from("local.toml")]
    );
    insta::assert_snapshot!(cli.global.to_config_overrides().join("\n"), @r"
    database.host=db.example.org
    global/output_log_level=4
    global/file_log_level=4
    global/dry=true
    repo/path=/srv/sensum-release
    ");
}

#[test]
fn test_file_log_level_overrides_console_level() {
    let cli = Cli::try_parse_from([
        "sensum-publish",
        "-l",
        "2",
        "--file-log-level",
        "5",
        "--log-file",
        "publish.log",
        "configs",
    ])
    .unwrap();

    let overrides = cli.global.to_config_overrides();
    assert!(overrides.contains(&"global/output_log_level=2".to_string()));
    assert!(overrides.contains(&"global/file_log_level=5".to_string()));
    assert!(overrides.contains(&"global/log_file=publish.log".to_string()));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["sensum-publish", "-l", "7"]).is_err());
}

#[test]
fn test_unknown_command() {
    assert!(Cli::try_parse_from(["sensum-publish", "build"]).is_err());
}
