// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish pipeline steps and their reports.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!    |
//!    v
//! Step (fixed order) ----> ToolContext (config, cancel token, dry run)
//!    |
//!    v
//! Cleanup -> SpatialExport -> TabularExport -> Stage -> Commit -> Push
//!    |             |               |             \_______|_______/
//!    v             v               v                     v
//! CleanupTool  Ogr2OgrTool      PsqlTool              GitTool
//!    |
//!    v
//! StepReport (Succeeded | Failed | Skipped | DryRun) --> PublishReport
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Step`] | The six steps, in execution order |
//! | [`FailurePolicy`] | Whether a failed step stops the run |
//! | [`StepReport`] | Outcome of one step with captured output |
//! | [`PublishReport`] | All step reports plus the aborting step |
//! | [`OutputFiles`] | The two artifacts written into the repository |

pub mod cleanup;
pub mod pipeline;
pub mod tools;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::process::builder::ProcessOutput;

/// Geometry-bearing view exported to GeoJSON.
pub const DATA_VIEW: &str = "object_res1.v_resolution1_data";

/// Attribute-only view exported to CSV.
pub const METADATA_VIEW: &str = "object_res1.v_resolution1_metadata";

/// EPSG code every GeoJSON export is reprojected to (WGS 84).
pub const TARGET_SRS: u32 = 4326;

/// Field delimiter of the CSV export.
pub const CSV_DELIMITER: char = ',';

/// Returns the commit message for a release of `dbname`.
#[must_use]
pub fn commit_message(dbname: &str) -> String {
    format!("new {dbname} release")
}

/// Strips the schema from a qualified view name.
fn view_short_name(view: &str) -> &str {
    view.rsplit_once('.').map_or(view, |(_, name)| name)
}

/// The two artifacts, both inside the repository working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    /// `<repo>/v_resolution1_data.geojson`
    pub geojson: PathBuf,
    /// `<repo>/v_resolution1_metadata.csv`
    pub csv: PathBuf,
}

impl OutputFiles {
    #[must_use]
    pub fn new(repo: &Path) -> Self {
        Self {
            geojson: repo.join(format!("{}.geojson", view_short_name(DATA_VIEW))),
            csv: repo.join(format!("{}.csv", view_short_name(METADATA_VIEW))),
        }
    }

    /// Both paths in cleanup order.
    #[must_use]
    pub fn all(&self) -> [&Path; 2] {
        [&self.geojson, &self.csv]
    }
}

/// Pipeline step.
///
/// Steps always run in the order of [`Step::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Remove the outputs of the previous run.
    Cleanup,
    /// Dump the data view to GeoJSON with `ogr2ogr`.
    SpatialExport,
    /// Dump the metadata view to CSV with `psql`.
    TabularExport,
    /// `git add`
    Stage,
    /// `git commit`
    Commit,
    /// `git push`
    Push,
}

impl Step {
    /// Returns all steps in execution order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Cleanup,
            Self::SpatialExport,
            Self::TabularExport,
            Self::Stage,
            Self::Commit,
            Self::Push,
        ]
    }

    /// Returns the display name for this step.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cleanup => "cleanup",
            Self::SpatialExport => "spatial_export",
            Self::TabularExport => "tabular_export",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Push => "push",
        }
    }

    /// Returns true for the steps that touch the repository.
    #[must_use]
    pub const fn is_git(&self) -> bool {
        matches!(self, Self::Stage | Self::Commit | Self::Push)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the pipeline does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log a warning and continue with the next step.
    Ignore,
    /// Stop; every remaining step is reported as skipped.
    Abort,
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// `exit_code` is `None` when no process ran (spawn or filesystem error).
    Failed {
        exit_code: Option<i32>,
        message: String,
    },
    Skipped,
    DryRun,
}

impl StepStatus {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("ok"),
            Self::Failed {
                exit_code: Some(code),
                message,
            } => write!(f, "failed (exit {code}): {message}"),
            Self::Failed {
                exit_code: None,
                message,
            } => write!(f, "failed: {message}"),
            Self::Skipped => f.write_str("skipped"),
            Self::DryRun => f.write_str("dry-run"),
        }
    }
}

/// Result of one step, with whatever output the tool produced.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub output: ProcessOutput,
}

impl StepReport {
    #[must_use]
    pub fn skipped(step: Step) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            output: ProcessOutput::default(),
        }
    }

    /// Builds a report from a finished process.
    ///
    /// A non-zero exit or an interruption becomes [`StepStatus::Failed`]
    /// with the last stderr line as message.
    #[must_use]
    pub fn from_output(step: Step, output: ProcessOutput, dry_run: bool) -> Self {
        let status = if output.is_interrupted() {
            StepStatus::Failed {
                exit_code: None,
                message: "interrupted".to_string(),
            }
        } else if output.success() {
            if dry_run {
                StepStatus::DryRun
            } else {
                StepStatus::Succeeded
            }
        } else {
            let message = output
                .stderr()
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map_or_else(|| "no error output".to_string(), |line| line.trim().to_string());
            StepStatus::Failed {
                exit_code: Some(output.exit_code()),
                message,
            }
        };
        Self {
            step,
            status,
            output,
        }
    }

    /// Builds a failed report for a step whose tool returned an error.
    #[must_use]
    pub fn from_error(step: Step, error: &anyhow::Error) -> Self {
        Self {
            step,
            status: StepStatus::Failed {
                exit_code: None,
                message: format!("{error:#}"),
            },
            output: ProcessOutput::default(),
        }
    }
}

/// Ordered step reports of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub steps: Vec<StepReport>,
    /// The step whose failure stopped the run.
    pub aborted_at: Option<Step>,
}

impl PublishReport {
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }

    #[must_use]
    pub fn get(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|report| report.step == step)
    }

    /// Steps that failed, whether or not their failure was ignored.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|report| report.status.is_failed())
    }

    /// One line per step, for the end-of-run summary.
    #[must_use]
    pub fn format_summary(&self) -> Vec<String> {
        let width = Step::all()
            .iter()
            .map(|step| step.name().len())
            .max()
            .unwrap_or(0);
        self.steps
            .iter()
            .map(|report| format!("{:<width$}  {}", report.step.name(), report.status))
            .collect()
    }
}
