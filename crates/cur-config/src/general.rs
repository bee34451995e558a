//! Run-wide settings: ranking cutoffs, output location, deadline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const fn default_top_k() -> usize {
    15
}

const fn default_min_relevance() -> f64 {
    5.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_file() -> String {
    "update_report.md".to_string()
}

fn default_artifact_file() -> String {
    "update_suggestions.json".to_string()
}

const fn default_run_deadline_secs() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Number of ranked candidates kept in the report.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Scored candidates below this relevance are left out of the report.
    #[serde(default = "default_min_relevance")]
    pub min_relevance: f64,

    /// Directory the report and artifact are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_report_file")]
    pub report_file: String,

    #[serde(default = "default_artifact_file")]
    pub artifact_file: String,

    /// Wall-clock budget for the whole run, in seconds.
    #[serde(default = "default_run_deadline_secs")]
    pub run_deadline_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_relevance: default_min_relevance(),
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            artifact_file: default_artifact_file(),
            run_deadline_secs: default_run_deadline_secs(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub const fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }

    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(&self.artifact_file)
    }
}
