// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact store — content-addressed files under a caller-chosen root.

use std::fs;
use std::path::{Path, PathBuf};

use scanwerk_core::error::{Result, ScanwerkError};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Lowercase hex SHA-256 of `data`.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Stores rectified images and reports by the SHA-256 of their bytes.
///
/// Several processes may share one root. Each write goes to a uniquely named
/// temporary file that is renamed into place, so a reader never sees a
/// partial artifact and two writers of the same content converge on the same
/// file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `data` and return its key.
    #[instrument(skip_all, fields(bytes = data.len()))]
    pub fn put(&self, data: &[u8]) -> Result<String> {
        let key = hash_bytes(data);
        let path = self.root.join(&key);
        if path.is_file() {
            debug!(%key, "Artifact already stored");
            return Ok(key);
        }

        fs::create_dir_all(&self.root)?;
        let tmp = self.root.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, data)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!(%key, path = %path.display(), "Artifact stored");
        Ok(key)
    }

    /// Read an artifact back, checking that its bytes still hash to `key`.
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.path_of(key)?)?;
        let actual = hash_bytes(&data);
        if actual != key {
            return Err(ScanwerkError::IntegrityMismatch {
                expected: key.to_owned(),
                actual,
            });
        }
        Ok(data)
    }

    /// Where the artifact for `key` lives. Keys must be 64 lowercase hex
    /// digits.
    pub fn path_of(&self, key: &str) -> Result<PathBuf> {
        let well_formed = key.len() == 64
            && key
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(ScanwerkError::Config(format!(
                "artifact key must be 64 lowercase hex digits, got {key:?}"
            )));
        }
        Ok(self.root.join(key))
    }
}
