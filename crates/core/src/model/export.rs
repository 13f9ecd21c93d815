use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::ids::ProblemId;
use crate::model::progress::Progress;

/// Version tag written into every export file.
pub const EXPORT_VERSION: &str = "1.0";

/// The downloadable progress document.
///
/// Imports must round-trip this schema; anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub completed_problems: Vec<ProblemId>,
    /// ISO-8601 timestamp of when the export was produced.
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportFile {
    /// Captures the current set into an export document.
    #[must_use]
    pub fn capture(progress: &Progress, at: DateTime<Utc>) -> Self {
        let mut completed_problems: Vec<ProblemId> = progress.iter().cloned().collect();
        completed_problems.sort();
        Self {
            completed_problems,
            export_date: at,
            version: EXPORT_VERSION.to_string(),
        }
    }
}

/// Errors surfaced to the user by the import path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    /// The payload is not JSON, or `completedProblems` is missing or is not
    /// an array of strings.
    #[error("invalid progress file format")]
    MalformedSchema,
}

/// Parses an imported progress document into the ids it carries.
///
/// Tolerant of extra fields and of a missing `exportDate`/`version` (older
/// files); strict about `completedProblems` being an array of strings. The
/// caller replaces its set wholesale on success; import never merges.
///
/// # Errors
///
/// Returns `ImportError::MalformedSchema` for any payload that does not
/// carry a well-formed `completedProblems` array.
pub fn parse_import(payload: &str) -> Result<Vec<ProblemId>, ImportError> {
    let value: Value = serde_json::from_str(payload).map_err(|_| ImportError::MalformedSchema)?;
    let ids = value
        .get("completedProblems")
        .and_then(Value::as_array)
        .ok_or(ImportError::MalformedSchema)?;

    ids.iter()
        .map(|entry| {
            entry
                .as_str()
                .map(ProblemId::new)
                .ok_or(ImportError::MalformedSchema)
        })
        .collect()
}
