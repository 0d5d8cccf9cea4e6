//! Content hash tracking
//!
//! Editors often rewrite a file without changing it. Changes whose content
//! hash matches the last seen hash are dropped before they reach the rebuild.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::BuildManifest;
use crate::domain::value_objects::ContentHash;

/// What a file-system event amounts to after hash filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentChange {
    Modified,
    Removed,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct ContentHashes {
    hashes: HashMap<PathBuf, ContentHash>,
}

impl ContentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the current content of every module in `manifest`.
    pub fn seed(manifest: &BuildManifest) -> Self {
        let mut hashes = Self::new();
        for record in manifest
            .environments
            .values()
            .flat_map(|env| env.modules.iter())
        {
            if let Ok(content) = std::fs::read(record.id.as_path()) {
                hashes
                    .hashes
                    .insert(record.id.as_path().to_path_buf(), ContentHash::from_bytes(&content));
            }
        }
        hashes
    }

    /// Record the current state of `path` and classify the change.
    pub fn observe(&mut self, path: &Path) -> ContentChange {
        match std::fs::read(path) {
            Ok(content) => {
                let hash = ContentHash::from_bytes(&content);
                if self.hashes.get(path) == Some(&hash) {
                    return ContentChange::Unchanged;
                }
                self.hashes.insert(path.to_path_buf(), hash);
                ContentChange::Modified
            }
            Err(_) if self.hashes.remove(path).is_some() => ContentChange::Removed,
            Err(_) => ContentChange::Unchanged,
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
