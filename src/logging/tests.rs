// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::SILENT));
    assert_eq!(LogLevel::from_u8(6), Some(LogLevel::DUMP));
    assert_eq!(LogLevel::from_u8(7), None);

    let err = LogLevel::new(9).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'log_level' in section '[global]': log level must be 0-6, got 9");
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<(u8, String)> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(|level| (level.as_u8(), level.to_filter_string()))
        .collect();

    assert_eq!(
        filters,
        vec![
            (0, "off".to_string()),
            (1, "error,sensum_publish=error".to_string()),
            (2, "warn,sensum_publish=warn".to_string()),
            (3, "warn,sensum_publish=info".to_string()),
            (4, "warn,sensum_publish=debug".to_string()),
            (5, "warn,sensum_publish=trace".to_string()),
            (6, "trace".to_string()),
        ]
    );
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_file_level(LogLevel::DEBUG)
        .with_log_file("logs/publish.log".to_string())
        .build();

    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some("logs/publish.log"));
}
