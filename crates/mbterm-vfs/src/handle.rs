//! Open-file handles for engines that stream a store entry.
//!
//! A handle copies the file's text when opened and works on that copy;
//! writable handles commit it back with [`OpenFile::flush`] or
//! [`OpenFile::close`]. Positions count characters, not bytes.

use mbterm_types::error::{MbtermError, Result};

use crate::VirtualFileStore;

/// Record length used when the engine does not give one.
pub const DEFAULT_RECORD_LENGTH: usize = 128;

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read an existing file from the start.
    Input,
    /// Start from an empty file.
    Output,
    /// Keep existing content and write at the end.
    Append,
    /// Fixed-length records; writes overwrite in place.
    Random,
}

impl OpenMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::Input)
    }
}

/// An open file.
#[derive(Debug, Clone)]
pub struct OpenFile {
    name: String,
    mode: OpenMode,
    record_length: usize,
    data: Vec<char>,
    position: usize,
    dirty: bool,
}

impl OpenFile {
    /// Open `name` in `mode`.
    ///
    /// `Input` fails with `FileNotFound` when the file is absent; the other
    /// modes create it on first commit. A zero record length falls back to
    /// [`DEFAULT_RECORD_LENGTH`].
    pub fn open(
        store: &VirtualFileStore,
        name: &str,
        mode: OpenMode,
        record_length: usize,
    ) -> Result<Self> {
        let data: Vec<char> = match mode {
            OpenMode::Input => store.get(name)?.chars().collect(),
            OpenMode::Output => Vec::new(),
            OpenMode::Append | OpenMode::Random => store
                .get(name)
                .map(|c| c.chars().collect())
                .unwrap_or_default(),
        };
        let position = match mode {
            OpenMode::Append => data.len(),
            _ => 0,
        };
        let record_length = if record_length == 0 {
            DEFAULT_RECORD_LENGTH
        } else {
            record_length
        };
        log::debug!("open {name} as {mode:?} (record length {record_length})");
        Ok(Self {
            name: name.to_string(),
            mode,
            record_length,
            data,
            position,
            // Opening for output truncates, which must reach the store even
            // if nothing is written.
            dirty: mode == OpenMode::Output,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    /// Current position in characters.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read up to the next newline, which is consumed but not returned.
    /// `None` at end of file.
    pub fn read_line(&mut self) -> Option<String> {
        if self.eof() {
            return None;
        }
        let rest = &self.data[self.position..];
        let end = rest.iter().position(|&c| c == '\n').unwrap_or(rest.len());
        let line: String = rest[..end].iter().collect();
        self.position += end + 1;
        Some(line)
    }

    /// Read up to `n` characters; shorter at end of file.
    pub fn read_chars(&mut self, n: usize) -> String {
        let start = self.position.min(self.data.len());
        let end = start.saturating_add(n).min(self.data.len());
        self.position = end;
        self.data[start..end].iter().collect()
    }

    /// Write at the current position, overwriting existing characters and
    /// extending the file past its end.
    pub fn write(&mut self, text: &str) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(MbtermError::BadFileMode(self.name.clone()));
        }
        // A seek past the end leaves a gap that is filled with blanks.
        if self.data.len() < self.position {
            self.data.resize(self.position, ' ');
        }
        for ch in text.chars() {
            if self.position < self.data.len() {
                self.data[self.position] = ch;
            } else {
                self.data.push(ch);
            }
            self.position += 1;
        }
        self.dirty = true;
        Ok(())
    }

    /// Write `line` followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write(line)?;
        self.write("\n")
    }

    /// Move to the start of 1-based `record`. Record 0 is treated as 1.
    pub fn seek_record(&mut self, record: usize) {
        self.position = record.saturating_sub(1).saturating_mul(self.record_length);
    }

    /// Current contents as text.
    pub fn contents(&self) -> String {
        self.data.iter().collect()
    }

    /// Commit the contents to the store without closing.
    pub fn flush(&mut self, store: &mut VirtualFileStore) -> Result<()> {
        if self.mode.is_writable() && self.dirty {
            store.set(&self.name, self.contents())?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Commit writable handles and release the handle.
    pub fn close(mut self, store: &mut VirtualFileStore) -> Result<()> {
        self.flush(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(name: &str, content: &str) -> VirtualFileStore {
        let mut store = VirtualFileStore::new();
        store.set(name, content).unwrap();
        store
    }

    #[test]
    fn input_missing_file_fails() {
        let store = VirtualFileStore::new();
        let err = OpenFile::open(&store, "NOPE.DAT", OpenMode::Input, 0).unwrap_err();
        assert!(matches!(err, MbtermError::FileNotFound(_)));
    }

    #[test]
    fn read_lines_until_eof() {
        let store = store_with("IN.TXT", "alpha\nbeta\ngamma");
        let mut f = OpenFile::open(&store, "IN.TXT", OpenMode::Input, 0).unwrap();
        assert_eq!(f.read_line().as_deref(), Some("alpha"));
        assert_eq!(f.read_line().as_deref(), Some("beta"));
        assert!(!f.eof());
        assert_eq!(f.read_line().as_deref(), Some("gamma"));
        assert!(f.eof());
        assert_eq!(f.read_line(), None);
    }

    #[test]
    fn trailing_newline_sets_eof() {
        let store = store_with("IN.TXT", "only\n");
        let mut f = OpenFile::open(&store, "IN.TXT", OpenMode::Input, 0).unwrap();
        assert_eq!(f.read_line().as_deref(), Some("only"));
        assert!(f.eof());
    }

    #[test]
    fn read_chars_stops_at_end() {
        let store = store_with("IN.TXT", "héllo");
        let mut f = OpenFile::open(&store, "IN.TXT", OpenMode::Input, 0).unwrap();
        assert_eq!(f.read_chars(2), "hé");
        assert_eq!(f.read_chars(10), "llo");
        assert!(f.eof());
        assert_eq!(f.read_chars(1), "");
    }

    #[test]
    fn input_is_read_only() {
        let mut store = store_with("IN.TXT", "x");
        let mut f = OpenFile::open(&store, "IN.TXT", OpenMode::Input, 0).unwrap();
        assert!(matches!(f.write("y"), Err(MbtermError::BadFileMode(_))));
        f.close(&mut store).unwrap();
        assert_eq!(store.get("IN.TXT").unwrap(), "x");
    }

    #[test]
    fn output_truncates_on_close() {
        let mut store = store_with("OUT.TXT", "old contents");
        let f = OpenFile::open(&store, "OUT.TXT", OpenMode::Output, 0).unwrap();
        assert!(f.is_empty());
        f.close(&mut store).unwrap();
        assert_eq!(store.get("OUT.TXT").unwrap(), "");
    }

    #[test]
    fn output_write_lines_commits() {
        let mut store = VirtualFileStore::new();
        let mut f = OpenFile::open(&store, "NEW.TXT", OpenMode::Output, 0).unwrap();
        f.write_line("one").unwrap();
        f.write("two").unwrap();
        assert!(!store.exists("NEW.TXT"));
        f.close(&mut store).unwrap();
        assert_eq!(store.get("NEW.TXT").unwrap(), "one\ntwo");
    }

    #[test]
    fn append_writes_at_end() {
        let mut store = store_with("LOG.TXT", "a\n");
        let mut f = OpenFile::open(&store, "LOG.TXT", OpenMode::Append, 0).unwrap();
        f.write_line("b").unwrap();
        f.close(&mut store).unwrap();
        assert_eq!(store.get("LOG.TXT").unwrap(), "a\nb\n");
    }

    #[test]
    fn flush_commits_without_closing() {
        let mut store = VirtualFileStore::new();
        let mut f = OpenFile::open(&store, "F.TXT", OpenMode::Append, 0).unwrap();
        f.write("partial").unwrap();
        f.flush(&mut store).unwrap();
        assert_eq!(store.get("F.TXT").unwrap(), "partial");
        f.write(" more").unwrap();
        f.close(&mut store).unwrap();
        assert_eq!(store.get("F.TXT").unwrap(), "partial more");
    }

    #[test]
    fn random_records_overwrite_in_place() {
        let mut store = store_with("R.DAT", "AAAABBBBCCCC");
        let mut f = OpenFile::open(&store, "R.DAT", OpenMode::Random, 4).unwrap();
        f.seek_record(2);
        assert_eq!(f.position(), 4);
        assert_eq!(f.read_chars(4), "BBBB");
        f.seek_record(2);
        f.write("XXXX").unwrap();
        f.seek_record(4);
        f.write("DDDD").unwrap();
        f.close(&mut store).unwrap();
        assert_eq!(store.get("R.DAT").unwrap(), "AAAAXXXXCCCCDDDD");
    }

    #[test]
    fn seek_past_end_is_eof() {
        let store = store_with("R.DAT", "ABCD");
        let mut f = OpenFile::open(&store, "R.DAT", OpenMode::Random, 4).unwrap();
        f.seek_record(5);
        assert!(f.eof());
        f.seek_record(0);
        assert_eq!(f.position(), 0);
    }

    #[test]
    fn write_after_gap_pads_with_blanks() {
        let mut store = VirtualFileStore::new();
        let mut f = OpenFile::open(&store, "R.DAT", OpenMode::Random, 2).unwrap();
        f.seek_record(3);
        f.write("ZZ").unwrap();
        f.close(&mut store).unwrap();
        assert_eq!(store.get("R.DAT").unwrap(), "    ZZ");
    }

    #[test]
    fn zero_record_length_uses_default() {
        let store = VirtualFileStore::new();
        let f = OpenFile::open(&store, "R.DAT", OpenMode::Random, 0).unwrap();
        assert_eq!(f.record_length(), DEFAULT_RECORD_LENGTH);
    }

    #[test]
    fn untouched_random_handle_does_not_create_file() {
        let mut store = VirtualFileStore::new();
        let f = OpenFile::open(&store, "R.DAT", OpenMode::Random, 8).unwrap();
        f.close(&mut store).unwrap();
        assert!(!store.exists("R.DAT"));
    }
}
