//! The boundary between the session and the statement-execution engine.
//!
//! The engine is an external collaborator: it parses and runs programs and
//! knows nothing about terminals or files. It talks to the outside world only
//! through an [`EngineHost`], which the session implements.
//!
//! Everything runs on one thread. An engine that needs a line of input calls
//! [`EngineHost::request_input`] and then returns
//! [`ExecOutcome::AwaitingInput`] from whichever entry point it is in. The
//! session hands the line back later through [`Engine::resume`].

use mbterm_types::error::Result;
use mbterm_vfs::OpenMode;

/// How an engine entry point returned control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The program ran to its end.
    Completed,
    /// The engine registered an input request and is waiting for a line.
    AwaitingInput,
    /// The engine honoured an interrupt at a check point.
    Interrupted,
    /// A runtime error ended the program. The message is shown verbatim.
    Failed(String),
}

/// Number of a file opened with [`EngineHost::open_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileHandle(pub u32);

/// Services the session offers to a running engine.
pub trait EngineHost {
    /// Append text to the terminal verbatim.
    fn print(&mut self, text: &str);

    /// Column the next printed character lands in, for `TAB`/`POS` and
    /// print zones.
    fn column(&self) -> usize;

    /// Change the column at which printed text wraps (`WIDTH`).
    fn set_terminal_width(&mut self, width: u16);

    /// Show `prompt` and register the one outstanding input request.
    ///
    /// Fails with `InputAlreadyPending` if a request is still unresolved.
    fn request_input(&mut self, prompt: &str) -> Result<()>;

    /// Oldest buffered key, or `None`. Never waits.
    fn poll_key(&mut self) -> Option<char>;

    fn clear_screen(&mut self);

    /// File contents for an open. Input mode yields `None` when the file is
    /// missing; output mode always yields an empty placeholder.
    fn file_open(&mut self, name: &str, mode: OpenMode, record_length: usize) -> Option<String>;

    /// Commit `data` as the contents of `name`.
    fn file_save(&mut self, name: &str, data: &str) -> Result<()>;

    fn file_exists(&self, name: &str) -> bool;

    fn file_delete(&mut self, name: &str) -> Result<()>;

    /// Rename atomically: either both halves happen or neither does.
    fn file_rename(&mut self, old: &str, new: &str) -> Result<()>;

    /// Open a streaming handle. Writes reach the store on flush or close;
    /// handles still open when a run ends are closed then.
    fn open_file(&mut self, name: &str, mode: OpenMode, record_length: usize)
    -> Result<FileHandle>;

    /// Next line from the handle, `None` at end of file.
    fn read_line(&mut self, handle: FileHandle) -> Result<Option<String>>;

    /// Up to `n` characters from the handle.
    fn read_chars(&mut self, handle: FileHandle, n: usize) -> Result<String>;

    fn write_file(&mut self, handle: FileHandle, text: &str) -> Result<()>;

    /// Position a random-access handle at 1-based `record`.
    fn seek_record(&mut self, handle: FileHandle, record: usize) -> Result<()>;

    fn file_eof(&self, handle: FileHandle) -> Result<bool>;

    fn flush_file(&mut self, handle: FileHandle) -> Result<()>;

    fn close_file(&mut self, handle: FileHandle) -> Result<()>;
}

/// A statement-execution engine driven by the session.
pub trait Engine {
    /// Parse and load a program. On failure, return the diagnostic text.
    fn load(&mut self, source: &str) -> std::result::Result<(), String>;

    /// Run the loaded program from the start.
    fn execute(&mut self, host: &mut dyn EngineHost) -> ExecOutcome;

    /// Continue after an input request with the line the user typed.
    fn resume(&mut self, line: &str, host: &mut dyn EngineHost) -> ExecOutcome;

    /// Ask the engine to stop at its next check point.
    fn interrupt(&mut self);

    /// Forget the loaded program.
    fn clear(&mut self);

    /// Evaluate one statement outside any program. `None` means the engine
    /// has no immediate mode.
    fn evaluate(&mut self, statement: &str, host: &mut dyn EngineHost) -> Option<ExecOutcome> {
        let _ = (statement, host);
        None
    }
}
