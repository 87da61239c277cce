//! Import and export at the store boundary.
//!
//! Uploading and downloading are the front end's business; the store only
//! accepts a batch of named texts and hands out one entry as a text artifact.

use mbterm_types::error::Result;

use crate::memory::checked_name;
use crate::{StoreEvent, VirtualFileStore};

/// A single store entry packaged for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name for the download.
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl VirtualFileStore {
    /// Add externally supplied files under their given names.
    ///
    /// The whole batch is validated first; if any name is unusable nothing
    /// is imported. Observers get a single `Imported` event.
    pub fn import<I, N, C>(&mut self, files: I) -> Result<usize>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let batch: Vec<(String, String)> = files
            .into_iter()
            .map(|(n, c)| (n.into(), c.into()))
            .collect();
        for (name, _) in &batch {
            checked_name(name)?;
        }
        let names: Vec<String> = batch.iter().map(|(n, _)| n.clone()).collect();
        for (name, content) in batch {
            self.insert(&name, content);
        }
        log::info!("Imported {} file(s)", names.len());
        let count = names.len();
        self.notify(&StoreEvent::Imported { names });
        Ok(count)
    }

    /// Package `name` as a plain-text download.
    pub fn export(&self, name: &str) -> Result<ExportArtifact> {
        let content = self.get(name)?;
        Ok(ExportArtifact {
            file_name: name.to_string(),
            mime_type: "text/plain",
            content: content.to_string(),
        })
    }
}
