// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command arguments.

use clap::Args;

/// Options of the publish command.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Stops after the local commit; nothing is pushed.
    #[arg(long = "no-push")]
    pub no_push: bool,
}
