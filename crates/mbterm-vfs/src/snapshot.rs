//! JSON snapshots of the store, so a front end can keep files between runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use mbterm_types::error::{MbtermError, Result};

use crate::memory::checked_name;
use crate::{StoreEvent, VirtualFile, VirtualFileStore};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    files: Vec<VirtualFile>,
}

impl VirtualFileStore {
    /// Serialize every file to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            files: self.files.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replace the store contents with a snapshot. Observers stay attached
    /// and receive one `Restored` event.
    pub fn restore_json(&mut self, json: &str) -> Result<usize> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(MbtermError::Config(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        for file in &snapshot.files {
            checked_name(&file.name)?;
        }
        self.files.clear();
        for file in snapshot.files {
            self.insert(&file.name, file.content);
        }
        let count = self.files.len();
        self.notify(&StoreEvent::Restored { count });
        Ok(count)
    }

    /// Write a snapshot file.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved {} file(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Restore from a snapshot file. A missing file leaves the store empty.
    pub fn load_snapshot(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            log::debug!("No snapshot at {}", path.display());
            return Ok(0);
        }
        let json = std::fs::read_to_string(path)?;
        self.restore_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let mut store = VirtualFileStore::new();
        store.set("A.BAS", "10 PRINT \"A\"").unwrap();
        store.set("notes.txt", "multi\nline").unwrap();
        let json = store.to_json().unwrap();

        let mut restored = VirtualFileStore::new();
        assert_eq!(restored.restore_json(&json).unwrap(), 2);
        assert_eq!(restored.get("A.BAS").unwrap(), "10 PRINT \"A\"");
        assert_eq!(restored.get("notes.txt").unwrap(), "multi\nline");
        assert_eq!(restored.list(), store.list());
    }

    #[test]
    fn restore_replaces_existing_files() {
        let mut store = VirtualFileStore::new();
        store.set("OLD", "o").unwrap();
        store
            .restore_json(r#"{"version":1,"files":[{"name":"NEW","content":"n"}]}"#)
            .unwrap();
        assert!(!store.exists("OLD"));
        assert_eq!(store.get("NEW").unwrap(), "n");
    }

    #[test]
    fn wrong_version_rejected() {
        let mut store = VirtualFileStore::new();
        let err = store
            .restore_json(r#"{"version":99,"files":[]}"#)
            .unwrap_err();
        assert!(matches!(err, MbtermError::Config(_)));
    }

    #[test]
    fn garbage_is_json_error() {
        let mut store = VirtualFileStore::new();
        store.set("KEEP", "k").unwrap();
        assert!(matches!(
            store.restore_json("not json"),
            Err(MbtermError::Json(_))
        ));
        assert!(store.exists("KEEP"));
    }

    #[test]
    fn snapshot_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.json");
        let mut store = VirtualFileStore::new();
        store.set("P.BAS", "10 END").unwrap();
        store.save_snapshot(&path).unwrap();

        let mut other = VirtualFileStore::new();
        assert_eq!(other.load_snapshot(&path).unwrap(), 1);
        assert_eq!(other.get("P.BAS").unwrap(), "10 END");
    }

    #[test]
    fn missing_snapshot_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VirtualFileStore::new();
        assert_eq!(store.load_snapshot(&dir.path().join("none.json")).unwrap(), 0);
        assert!(store.is_empty());
    }
}
