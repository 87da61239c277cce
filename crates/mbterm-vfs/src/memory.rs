//! In-memory store implementation.
//!
//! The whole store lives in a `BTreeMap<String, VirtualFile>` keyed by the
//! canonical (ASCII-uppercased) file name, so listings come out sorted and
//! names differing only by case address the same entry.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use mbterm_types::error::{MbtermError, Result};

use crate::{FileInfo, StoreEvent, StoreObserver, VirtualFile};

/// Name-keyed text file store shared by the editor and the engine.
pub struct VirtualFileStore {
    /// Canonical name -> file.
    pub(crate) files: BTreeMap<String, VirtualFile>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl VirtualFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            observers: Vec::new(),
        }
    }

    /// Attach an observer notified after every mutation.
    pub fn attach_observer(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    /// All files in canonical-name order.
    pub fn list(&self) -> Vec<FileInfo> {
        self.files
            .values()
            .map(|f| FileInfo {
                name: f.name.clone(),
                size: f.content.len(),
            })
            .collect()
    }

    /// Contents of `name`.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.files
            .get(canonical(name).as_ref())
            .map(|f| f.content.as_str())
            .ok_or_else(|| MbtermError::FileNotFound(name.to_string()))
    }

    /// Create or overwrite `name`.
    pub fn set(&mut self, name: &str, content: impl Into<String>) -> Result<()> {
        let name = checked_name(name)?;
        self.insert(name, content.into());
        self.notify(&StoreEvent::Written {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Remove `name`.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        match self.files.remove(canonical(name).as_ref()) {
            Some(file) => {
                self.notify(&StoreEvent::Deleted { name: file.name });
                Ok(())
            },
            None => Err(MbtermError::FileNotFound(name.to_string())),
        }
    }

    /// Move `old` to `new`, replacing any file already called `new`.
    ///
    /// All checks happen before the map is touched, so a failed rename
    /// leaves the store unchanged.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = checked_name(new)?;
        let old_key = canonical(old);
        if !self.files.contains_key(old_key.as_ref()) {
            return Err(MbtermError::FileNotFound(old.to_string()));
        }
        if let Some(file) = self.files.remove(old_key.as_ref()) {
            let from = file.name;
            self.insert(new, file.content);
            self.notify(&StoreEvent::Renamed {
                from,
                to: new.to_string(),
            });
        }
        Ok(())
    }

    /// Whether `name` is present.
    pub fn exists(&self, name: &str) -> bool {
        self.files.contains_key(canonical(name).as_ref())
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &str, content: String) {
        self.files.insert(
            canonical(name).into_owned(),
            VirtualFile {
                name: name.to_string(),
                content,
            },
        );
    }

    pub(crate) fn notify(&self, event: &StoreEvent) {
        log::debug!("store changed: {event:?}");
        for observer in &self.observers {
            observer.store_changed(event);
        }
    }
}

impl Default for VirtualFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VirtualFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualFileStore")
            .field("files", &self.files)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Canonical lookup key: the ASCII-uppercased name. Returns the input
/// unchanged (zero-alloc) when it has no lowercase ASCII letters.
pub(crate) fn canonical(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_lowercase()) {
        Cow::Owned(name.to_ascii_uppercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Reject names that cannot be stored.
pub(crate) fn checked_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(MbtermError::BadFileName);
    }
    Ok(name)
}
