// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Publish (default) | Options | Configs | Version
//! ```

use std::process::ExitCode;

use anyhow::Context;
use sensum_publish::cli::global::GlobalOptions;
use sensum_publish::cli::publish::PublishArgs;
use sensum_publish::cli::{self, Command};
use sensum_publish::cmd::config::{run_configs_command, run_options_command};
use sensum_publish::cmd::publish::run_publish_command;
use sensum_publish::config::Config;
use sensum_publish::config::loader::ConfigLoader;
use sensum_publish::config::types::GlobalConfig;
use sensum_publish::error::Result;
use sensum_publish::logging::LogConfig;
use sensum_publish::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Optional configuration file picked up from the current directory.
const DEFAULT_CONFIG_FILE: &str = "sensum-publish.toml";

/// Prefix of `SENSUM_<SECTION>__<KEY>` environment overrides.
const ENV_PREFIX: &str = "SENSUM";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Configs) => build_config_loader(&cli.global)
            .map(|loader| run_configs_command(&loader.format_loaded_files())),
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Publish(args)) => publish(args, &cli.global).await,
        None => publish(&PublishArgs::default(), &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn publish(args: &PublishArgs, global: &GlobalOptions) -> Result<()> {
    let config = load_config(global)?;
    let _log_guard =
        init_logging(&build_log_config(&config.global)).context("failed to initialize logging")?;
    run_publish_command(args, config).await
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for config_path in &global.configs {
        loader = loader.add_toml_file(config_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for assignment in global.to_config_overrides() {
        loader = loader.set_assignment(&assignment)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}
