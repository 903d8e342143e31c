//! JSON snapshots of a store.

use std::fs;
use std::path::Path;

use ledgerwright_shared::{AppError, AppResult};
use tracing::debug;

use crate::memory::MemoryStore;

impl MemoryStore {
    /// Parses a snapshot.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the store as indented JSON.
    pub fn to_json_pretty(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a snapshot file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| AppError::Internal(format!("cannot read {}: {e}", path.display())))?;
        let store = Self::from_json(&json)?;
        debug!(path = %path.display(), lines = store.lines.len(), taxes = store.taxes.len(), "loaded snapshot");
        Ok(store)
    }

    /// Writes a snapshot file, replacing it.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let json = self.to_json_pretty()?;
        fs::write(path, json)
            .map_err(|e| AppError::Internal(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }
}
