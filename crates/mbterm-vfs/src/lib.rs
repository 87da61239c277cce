//! Virtual file store.
//!
//! A flat, name-keyed store of text files standing in for a disk. The editor
//! (`LOAD`/`SAVE`/`FILES`), the execution engine (through the session's
//! engine host) and the front end's transfer operations all share one
//! [`VirtualFileStore`].
//!
//! File names are matched case-insensitively through a canonical key (the
//! ASCII-uppercased name); the spelling most recently written is kept for
//! display.

pub mod handle;
mod memory;
mod snapshot;
mod transfer;

use serde::{Deserialize, Serialize};

pub use handle::{DEFAULT_RECORD_LENGTH, OpenFile, OpenMode};
pub use memory::VirtualFileStore;
pub use transfer::ExportArtifact;

/// A named text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFile {
    /// Display name, as last written.
    pub name: String,
    /// File contents.
    pub content: String,
}

/// One row of a store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    /// Content length in bytes.
    pub size: usize,
}

/// A change applied to the store, delivered to observers after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Written { name: String },
    Deleted { name: String },
    Renamed { from: String, to: String },
    /// A batch of externally supplied files was added.
    Imported { names: Vec<String> },
    /// The whole store was replaced from a snapshot.
    Restored { count: usize },
}

/// Receives a notification after every store mutation, e.g. to refresh a
/// file list view.
pub trait StoreObserver {
    fn store_changed(&self, event: &StoreEvent);
}
