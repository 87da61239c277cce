//! The session side of the engine boundary: terminal, file store, key
//! buffer and the single pending input request.

use std::collections::{BTreeMap, VecDeque};

use mbterm_types::error::{MbtermError, Result};
use mbterm_vfs::{OpenFile, OpenMode, VirtualFileStore};

use crate::engine::{EngineHost, FileHandle};
use crate::terminal::Terminal;

/// A suspended request for one line of terminal input.
///
/// Created when the engine asks for input and consumed by
/// [`Continuation::resolve`], so each request is answered exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct Continuation {
    id: u64,
    prompt: String,
}

impl Continuation {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer the request with the literal text the user submitted.
    ///
    /// Taking `self` retires the request; the answer carries its id so the
    /// resume can be matched to the request it belongs to.
    pub fn resolve(self, text: &str) -> InputLine {
        log::debug!("input request {} resolved", self.id);
        InputLine {
            request: self.id,
            prompt: self.prompt,
            text: text.to_string(),
        }
    }
}

/// The answer to one input request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    /// Id of the [`Continuation`] this answers.
    pub request: u64,
    pub prompt: String,
    /// Exactly what the user submitted, untrimmed.
    pub text: String,
}

/// State the engine can reach while it runs.
#[derive(Debug)]
pub struct SessionHost {
    pub terminal: Terminal,
    pub store: VirtualFileStore,
    keys: VecDeque<char>,
    pending: Option<Continuation>,
    next_request: u64,
    violation: bool,
    files: BTreeMap<FileHandle, OpenFile>,
    next_handle: u32,
}

impl SessionHost {
    pub fn new(terminal: Terminal, store: VirtualFileStore) -> Self {
        Self {
            terminal,
            store,
            keys: VecDeque::new(),
            pending: None,
            next_request: 1,
            violation: false,
            files: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn open_files(&self) -> usize {
        self.files.len()
    }

    /// Close every open handle, committing writable ones. Called when a run
    /// ends; a commit failure is logged and the remaining handles still
    /// close.
    pub(crate) fn close_all_files(&mut self) {
        for (handle, file) in std::mem::take(&mut self.files) {
            if let Err(e) = file.close(&mut self.store) {
                log::error!("closing file #{}: {e}", handle.0);
            }
        }
    }

    fn file(&self, handle: FileHandle) -> Result<&OpenFile> {
        self.files
            .get(&handle)
            .ok_or(MbtermError::BadFileNumber(handle.0))
    }

    fn file_mut(&mut self, handle: FileHandle) -> Result<&mut OpenFile> {
        self.files
            .get_mut(&handle)
            .ok_or(MbtermError::BadFileNumber(handle.0))
    }

    /// Buffer a key for `poll_key`, in arrival order.
    pub fn push_key(&mut self, key: char) {
        self.keys.push_back(key);
    }

    pub fn buffered_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn clear_keys(&mut self) {
        self.keys.clear();
    }

    pub fn pending_input(&self) -> Option<&Continuation> {
        self.pending.as_ref()
    }

    pub fn has_pending_input(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn take_pending(&mut self) -> Option<Continuation> {
        self.pending.take()
    }

    /// Register a request the engine signalled without calling
    /// `request_input` first.
    pub(crate) fn ensure_pending(&mut self) {
        if self.pending.is_none() {
            log::warn!("engine awaits input without requesting it");
            self.register("");
        }
    }

    /// Whether the engine broke the single-request rule since the last call.
    pub(crate) fn take_violation(&mut self) -> bool {
        std::mem::take(&mut self.violation)
    }

    fn register(&mut self, prompt: &str) {
        let id = self.next_request;
        self.next_request += 1;
        log::debug!("input request {id} registered");
        self.pending = Some(Continuation {
            id,
            prompt: prompt.to_string(),
        });
    }
}

impl EngineHost for SessionHost {
    fn print(&mut self, text: &str) {
        self.terminal.print(text);
    }

    fn column(&self) -> usize {
        self.terminal.column()
    }

    fn set_terminal_width(&mut self, width: u16) {
        log::debug!("terminal width set to {width}");
        self.terminal.set_width(width);
    }

    fn request_input(&mut self, prompt: &str) -> Result<()> {
        if self.pending.is_some() {
            log::error!("engine requested input while a request is outstanding");
            self.violation = true;
            return Err(MbtermError::InputAlreadyPending);
        }
        self.terminal.print(prompt);
        self.register(prompt);
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }

    fn clear_screen(&mut self) {
        self.terminal.clear();
    }

    fn file_open(&mut self, name: &str, mode: OpenMode, record_length: usize) -> Option<String> {
        match OpenFile::open(&self.store, name, mode, record_length) {
            Ok(file) => Some(file.contents()),
            Err(e) => {
                log::debug!("file_open {name}: {e}");
                None
            },
        }
    }

    fn file_save(&mut self, name: &str, data: &str) -> Result<()> {
        self.store.set(name, data)
    }

    fn file_exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    fn file_delete(&mut self, name: &str) -> Result<()> {
        self.store.delete(name)
    }

    fn file_rename(&mut self, old: &str, new: &str) -> Result<()> {
        self.store.rename(old, new)
    }

    fn open_file(
        &mut self,
        name: &str,
        mode: OpenMode,
        record_length: usize,
    ) -> Result<FileHandle> {
        let file = OpenFile::open(&self.store, name, mode, record_length)?;
        let handle = FileHandle(self.next_handle);
        self.next_handle += 1;
        self.files.insert(handle, file);
        Ok(handle)
    }

    fn read_line(&mut self, handle: FileHandle) -> Result<Option<String>> {
        Ok(self.file_mut(handle)?.read_line())
    }

    fn read_chars(&mut self, handle: FileHandle, n: usize) -> Result<String> {
        Ok(self.file_mut(handle)?.read_chars(n))
    }

    fn write_file(&mut self, handle: FileHandle, text: &str) -> Result<()> {
        self.file_mut(handle)?.write(text)
    }

    fn seek_record(&mut self, handle: FileHandle, record: usize) -> Result<()> {
        self.file_mut(handle)?.seek_record(record);
        Ok(())
    }

    fn file_eof(&self, handle: FileHandle) -> Result<bool> {
        Ok(self.file(handle)?.eof())
    }

    fn flush_file(&mut self, handle: FileHandle) -> Result<()> {
        let file = self
            .files
            .get_mut(&handle)
            .ok_or(MbtermError::BadFileNumber(handle.0))?;
        file.flush(&mut self.store)
    }

    fn close_file(&mut self, handle: FileHandle) -> Result<()> {
        let file = self
            .files
            .remove(&handle)
            .ok_or(MbtermError::BadFileNumber(handle.0))?;
        file.close(&mut self.store)
    }
}
