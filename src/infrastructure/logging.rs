use super::config::LOG_FILTER_ENV;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber that appends to `path`.
///
/// The terminal belongs to the UI, so logs only ever go to a file. Without a
/// path no subscriber is installed and tracing events are discarded.
pub fn init_logging(path: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(path = %path.display(), "logging started");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_path_is_noop() {
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn test_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tcalc.log");

        init_logging(Some(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("tcalc.log");
        assert!(init_logging(Some(&path)).is_err());
    }
}
