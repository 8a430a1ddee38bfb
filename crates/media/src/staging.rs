//! Temporary artifact store.
//!
//! Ownership rule: the request handler that stages a payload deletes it once
//! its dispatch completes, success or failure. The sweep only reclaims
//! orphans older than an age threshold, so it never races an in-flight
//! upload.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use {thiserror::Error, tracing::debug, tracing::warn, uuid::Uuid};

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write staged artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One staged payload on disk. Holds a collision-resistant name, never the
/// caller-supplied filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub name: String,
    pub path: PathBuf,
}

/// Stages binary request payloads as uniquely-named files under one
/// directory so the upload step can read them by path.
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    /// Open the store, creating the staging directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StagingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` fully to a fresh uniquely-named file. Staging the same
    /// bytes twice yields two distinct artifacts; there is no dedup.
    pub async fn stage(&self, bytes: &[u8]) -> Result<StagedArtifact, StagingError> {
        let name = Uuid::new_v4().to_string();
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StagingError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(artifact = %name, len = bytes.len(), "payload staged");
        Ok(StagedArtifact { name, path })
    }

    /// Delete an artifact this handler staged. Best-effort; a missing file is
    /// not an error (the sweep may have reclaimed an old orphan).
    pub async fn remove(&self, artifact: &StagedArtifact) {
        match tokio::fs::remove_file(&artifact.path).await {
            Ok(()) => debug!(artifact = %artifact.name, "staged artifact removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => warn!(artifact = %artifact.name, error = %e, "failed to remove staged artifact"),
        }
    }

    /// Delete every artifact older than `max_age`. Per-file failures are
    /// logged and the sweep continues. Returns the number of files removed.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "failed to list staging dir");
                return 0;
            },
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "failed to read staging dir entry");
                    break;
                },
            };
            if !is_orphan(&entry, max_age).await {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to sweep staged artifact");
                },
            }
        }
        removed
    }
}

/// An entry is an orphan when it has sat in the staging dir longer than
/// `max_age`. Unreadable metadata counts as orphaned so broken entries still
/// get reclaimed.
async fn is_orphan(entry: &tokio::fs::DirEntry, max_age: Duration) -> bool {
    let Ok(meta) = entry.metadata().await else {
        return true;
    };
    let Ok(modified) = meta.modified() else {
        return true;
    };
    modified.elapsed().map(|age| age >= max_age).unwrap_or(false)
}
