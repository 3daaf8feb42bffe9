//! File persistence. The path is fixed for the lifetime of the session and
//! every save rewrites the file from scratch.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: std::io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Reads the file whole. The file must already exist; a missing or
    /// unreadable path is fatal to session startup.
    pub fn open(path: &Path) -> Result<(Self, Vec<u8>), FileError> {
        let bytes = fs::read(path).map_err(|source| FileError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            path: path.to_path_buf(),
        };
        Ok((store, bytes))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents and flushes to disc. Returns the number
    /// of bytes written.
    pub fn save(&self, contents: &str) -> Result<usize, FileError> {
        let write_err = |source| FileError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = fs::File::create(&self.path).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        Ok(contents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileStore::open(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn save_truncates_and_reports_byte_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "some much longer original contents\n").unwrap();

        let (store, bytes) = FileStore::open(&path).unwrap();
        assert_eq!(bytes, b"some much longer original contents\n");

        let written = store.save("short\n").unwrap();
        assert_eq!(written, 6);
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn save_into_directory_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "x\n").unwrap();
        let (store, _) = FileStore::open(&path).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        let err = store.save("x\n").unwrap_err();
        assert!(matches!(err, FileError::Write { .. }));
    }
}
