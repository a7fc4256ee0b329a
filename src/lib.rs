// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            publish / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              | defaults, TOML, env, --set|
//!              '------+-------------+------'
//!                     |             |
//!                     v             v
//!                   task           git
//!                 pipeline      gix queries
//!                     |
//!          +----------+----------+
//!          v                     v
//!       cleanup                tools
//!                     ogr2ogr / psql / git
//!
//!   +-----------------------------------------+
//!   |  core       process (spawn, stream)     |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod task;
