//! Whole-document persistence for the registry.
//!
//! The registry lives in a single JSON file. Every command loads it in full,
//! mutates it in memory, and writes it back in full. There is no locking:
//! two writers racing on the same file lose one of the two updates.
//!
//! ## Failure behavior
//!
//! - [`RegistryStore::load`] never fails. A missing or unreadable file
//!   yields [`Registry::default`] and a warning in the log. A file that is
//!   not a registry is first moved aside to `<name>.corrupt`, so the next
//!   save cannot destroy hand edits.
//! - [`RegistryStore::save`] writes to a temporary file in the same
//!   directory and renames it over the target, so readers see either the
//!   old document or the new one, never a partial write.

use crate::types::Registry;
use log::{debug, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle on the registry file. Holds no state besides the path.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the registry, or the default registry when the file is missing
    /// or cannot be parsed.
    pub fn load(&self) -> Registry {
        match self.try_load() {
            Ok(registry) => registry,
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no registry at {}, starting fresh", self.path.display());
                Registry::default()
            }
            Err(StoreError::Json(e)) => {
                let backup = self.corrupt_backup_path();
                match fs::rename(&self.path, &backup) {
                    Ok(()) => warn!(
                        "registry at {} is not valid ({e}); moved it to {} and started fresh",
                        self.path.display(),
                        backup.display()
                    ),
                    Err(rename_err) => warn!(
                        "registry at {} is not valid ({e}) and could not be moved aside ({rename_err}); falling back to defaults",
                        self.path.display()
                    ),
                }
                Registry::default()
            }
            Err(e) => {
                warn!(
                    "registry at {} is unusable ({e}); falling back to defaults",
                    self.path.display()
                );
                Registry::default()
            }
        }
    }

    /// Where [`load`](Self::load) moves a registry file it cannot parse.
    pub fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Load the registry, reporting why it could not be read.
    pub fn try_load(&self) -> Result<Registry, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Atomically replace the registry file with `registry`.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut tmp, registry)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(
            "saved {} projects to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}
