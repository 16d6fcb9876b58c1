//! Durable trail of the observations sent to the recognizer.
//!
//! The recognizer reads its observations from this file, so each line is
//! flushed and synced to disk before the matching request goes out.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{RecognizerError, RecognizerResult};

/// Append-only observation file, truncated when opened.
#[derive(Debug)]
pub struct ObservationLog {
    path: PathBuf,
    file: File,
    written: usize,
}

impl ObservationLog {
    /// Create or truncate the log, creating parent folders as needed.
    pub fn create(path: &Path) -> RecognizerResult<Self> {
        let err = |e| RecognizerError::ObservationLog {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(err)?;
        }
        File::create(path).map_err(err)?;
        let file = OpenOptions::new().append(true).open(path).map_err(err)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    /// Append one observation line and force it to storage.
    pub fn write_observation(&mut self, observation: &str) -> RecognizerResult<()> {
        let path = &self.path;
        let err = |e| RecognizerError::ObservationLog {
            path: path.display().to_string(),
            source: e,
        };
        writeln!(self.file, "{observation}").map_err(err)?;
        self.file.flush().map_err(err)?;
        self.file.sync_all().map_err(err)?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Observations written since the log was opened.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_truncates_previous_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("obs.dat");
        std::fs::write(&path, "stale\n").unwrap();

        let mut log = ObservationLog::create(&path).unwrap();
        log.write_observation("(A1),(on A1 A1)").unwrap();
        log.write_observation("(B1)").unwrap();

        assert_eq!(log.written(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "(A1),(on A1 A1)\n(B1)\n");
    }

    #[test]
    fn create_makes_parent_folders() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("demo").join("obs.dat");
        let log = ObservationLog::create(&path).unwrap();
        assert!(log.path().exists());
    }
}
