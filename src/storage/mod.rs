use std::fs;
use std::path::Path;

use crate::error::{Result, SuiteError};
use crate::testing::RunReport;

/// Write the report as pretty JSON, creating missing parent directories.
pub fn save_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SuiteError::Report {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let raw = serde_json::to_string_pretty(report)?;
    fs::write(path, raw).map_err(|source| SuiteError::Report {
        path: path.display().to_string(),
        source,
    })
}
