//! Per-cycle scratch file.
//!
//! The downloaded payload is spooled to disk before decompression. The file
//! is removed when the guard drops, on every exit path; removal failures are
//! logged and never surface as cycle errors.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub struct ScratchFile {
    file: Option<NamedTempFile>,
}

impl ScratchFile {
    /// Write `data` to a fresh `radar_*.bin` file in `dir`.
    pub fn create_in(dir: &Path, data: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("radar_")
            .suffix(".bin")
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;

        debug!(path = %file.path().display(), bytes = data.len(), "Spooled payload");
        Ok(Self { file: Some(file) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    /// Read the whole file back from the start.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "scratch file already closed"))?;

        let handle = file.as_file_mut();
        handle.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        handle.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        let path = file.path().to_path_buf();
        match file.close() {
            Ok(()) => debug!(path = %path.display(), "Removed scratch file"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scratch file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut scratch = ScratchFile::create_in(dir.path(), b"payload").unwrap();
            assert_eq!(scratch.read_all().unwrap(), b"payload");
            scratch.path().unwrap().to_path_buf()
        };

        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_removal_error_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::create_in(dir.path(), b"x").unwrap();

        // Remove it out from under the guard; drop must only log
        std::fs::remove_file(scratch.path().unwrap()).unwrap();
        drop(scratch);
    }

    #[test]
    fn test_missing_dir_fails_create() {
        assert!(ScratchFile::create_in(Path::new("/nonexistent/radar"), b"x").is_err());
    }
}
