// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for sensum-publish using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! sensum-publish [global options] [command]
//! publish [--no-push]   (default)
//! options
//! configs
//! version
//! ```

pub mod global;
pub mod publish;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::publish::PublishArgs;
use clap::{Parser, Subcommand};

/// `sensum_db` release publisher
///
/// Exports the data and metadata views of a `sensum_db` database and pushes
/// them to a git repository.
#[derive(Debug, Parser)]
#[command(
    name = "sensum-publish",
    author,
    version,
    about = "Publish sensum_db releases to git",
    long_about = "sensum-publish Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Dumps object_res1.v_resolution1_data to GeoJSON (ogr2ogr) and\n\
                  object_res1.v_resolution1_metadata to CSV (psql) inside the\n\
                  release repository, then commits and pushes them.\n\n\
                  Running `sensum-publish` without a command publishes.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `sensum-publish.toml` in the current\n\
                  directory (if present), then from every --config file, then from\n\
                  SENSUM_<SECTION>__<KEY> environment variables, then from --set.\n\
                  Use --no-default-config to skip `sensum-publish.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files that were loaded.
    Configs,

    /// Exports both views and publishes them (the default).
    Publish(PublishArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
