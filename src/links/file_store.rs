//! File Link Store
//!
//! One `<code>.txt` file per record inside a directory.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{LinkError, Result};
use crate::links::{is_valid_code, LinkRecord, LinkStore};

const RECORD_EXTENSION: &str = "txt";

/// Directory-backed [`LinkStore`].
///
/// Codes that are not plain alphanumerics are treated as absent, so caller
/// input never resolves to a path outside the directory.
#[derive(Debug, Clone)]
pub struct FileLinkStore {
    dir: PathBuf,
}

impl FileLinkStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, code: &str) -> Option<PathBuf> {
        is_valid_code(code).then(|| self.dir.join(format!("{}.{}", code, RECORD_EXTENSION)))
    }

    fn read_record(&self, code: &str, path: &Path) -> Result<Option<LinkRecord>> {
        match fs::read_to_string(path) {
            Ok(text) => LinkRecord::decode(code, &text).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LinkError::Storage(e)),
        }
    }
}

impl LinkStore for FileLinkStore {
    fn save(&mut self, record: &LinkRecord) -> Result<()> {
        let path = self.record_path(&record.short_code).ok_or_else(|| {
            LinkError::InvalidValue(format!("unstorable short code {:?}", record.short_code))
        })?;

        // Write a sibling file and rename it over the record so a crash never
        // leaves a half-written record behind.
        let tmp = path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(record.encode().as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!("Saved link {} to {}", record.short_code, path.display());
        Ok(())
    }

    fn load(&self, code: &str) -> Result<Option<LinkRecord>> {
        match self.record_path(code) {
            Some(path) => self.read_record(code, &path),
            None => Ok(None),
        }
    }

    fn delete(&mut self, code: &str) -> Result<()> {
        let Some(path) = self.record_path(code) else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted link file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LinkError::Storage(e)),
        }
    }

    fn list_all(&self) -> Result<Vec<LinkRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION)
            {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_valid_code(code) {
                continue;
            }

            match self.read_record(code, &path) {
                Ok(Some(record)) => records.push(record),
                // Removed between listing and reading
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable link file {}: {}", path.display(), e),
            }
        }

        Ok(records)
    }

    fn contains(&self, code: &str) -> Result<bool> {
        Ok(self.record_path(code).is_some_and(|path| path.exists()))
    }
}
