//! Writing the markdown report and JSON artifact to disk.

use std::path::{Path, PathBuf};

use cur_core::report::RunReport;

use crate::render::render_markdown;

/// The one fatal error of a run: the report could not be persisted.
#[derive(Debug, thiserror::Error)]
pub enum ReportWriteError {
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize run report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the artifacts of a run ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub report_path: PathBuf,
    pub artifact_path: PathBuf,
}

/// Write `report` as markdown to `report_path` and as JSON to `artifact_path`,
/// creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ReportWriteError`] if serialization or any filesystem write fails.
pub fn write_artifacts(
    report: &RunReport,
    report_path: &Path,
    artifact_path: &Path,
) -> Result<WrittenArtifacts, ReportWriteError> {
    let json = serde_json::to_string_pretty(report)?;
    write_file(report_path, &render_markdown(report))?;
    write_file(artifact_path, &json)?;

    tracing::info!(
        report = %report_path.display(),
        artifact = %artifact_path.display(),
        "wrote run artifacts"
    );
    Ok(WrittenArtifacts {
        report_path: report_path.to_path_buf(),
        artifact_path: artifact_path.to_path_buf(),
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportWriteError> {
    let io_err = |source| ReportWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
