// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only repository inspection.
//!
//! ```text
//!   query.rs --> gix --> .git/ (no subprocess)
//!
//!   is_git_repo · current_branch · has_uncommitted_changes
//! ```
//!
//! Everything that writes to the repository (add, commit, push) goes through
//! the `git` executable in [`crate::task::tools::git`], so credential helpers
//! and hooks behave exactly as they do on the command line.

pub mod query;
