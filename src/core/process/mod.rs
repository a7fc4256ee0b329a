// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::resolve("ogr2ogr")
//!   .args() .cwd() .env() .redact() .capture_output()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command
//!           stream stdout/stderr into tracing
//!           kill on cancellation
//!       --> ProcessOutput { exit_code, stdout, stderr, interrupted }
//! ```

pub mod builder;
mod io;
mod runner;
