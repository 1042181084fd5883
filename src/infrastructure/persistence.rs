use crate::domain::Snapshot;
use std::fmt;
use std::fs;

#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Format(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "{}", e),
            PersistenceError::Json(e) => write!(f, "Invalid file format - {}", e),
            PersistenceError::Csv(e) => write!(f, "CSV error: {}", e),
            PersistenceError::Format(msg) => write!(f, "Invalid file format - {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(e: csv::Error) -> Self {
        PersistenceError::Csv(e)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Reads and writes grid snapshots as JSON files.
pub struct FileRepository;

impl FileRepository {
    /// Writes `snapshot` as pretty-printed JSON and returns the filename.
    pub fn save_snapshot(snapshot: &Snapshot, filename: &str) -> PersistenceResult<String> {
        let result = serde_json::to_string_pretty(snapshot)
            .map_err(PersistenceError::from)
            .and_then(|json| fs::write(filename, json).map_err(PersistenceError::from));

        match result {
            Ok(()) => {
                tracing::info!(filename, rows = snapshot.len(), "saved snapshot");
                Ok(filename.to_string())
            }
            Err(e) => {
                tracing::warn!(filename, error = %e, "failed to save snapshot");
                Err(e)
            }
        }
    }

    /// Reads a snapshot file. A file holding JSON `null` yields `None`.
    pub fn load_snapshot(filename: &str) -> PersistenceResult<(Option<Snapshot>, String)> {
        let result = fs::read_to_string(filename)
            .map_err(PersistenceError::from)
            .and_then(|content| {
                serde_json::from_str::<Option<Snapshot>>(&content).map_err(PersistenceError::from)
            });

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    filename,
                    rows = snapshot.as_ref().map_or(0, Snapshot::len),
                    "loaded snapshot"
                );
                Ok((snapshot, filename.to_string()))
            }
            Err(e) => {
                tracing::warn!(filename, error = %e, "failed to load snapshot");
                Err(e)
            }
        }
    }
}
