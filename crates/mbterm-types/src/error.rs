//! Error types for mbterm.

use std::io;

/// Errors produced by the mbterm session layer.
///
/// The user-facing variants are recovered at the command boundary and shown
/// as a styled terminal line; none of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum MbtermError {
    #[error("No program to run")]
    EmptyProgram,

    /// The engine rejected the program text. The message is its diagnostic.
    #[error("{0}")]
    LoadError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Engine not loaded")]
    EngineUnavailable,

    #[error("Immediate mode not yet supported. Use editor and RUN.")]
    UnsupportedImmediate,

    #[error("Bad file name")]
    BadFileName,

    /// A write was attempted on a file opened for input.
    #[error("Bad file mode: {0}")]
    BadFileMode(String),

    #[error("Line number out of range: {0}")]
    LineNumberOutOfRange(String),

    /// Program text contained a line without a line number.
    #[error("Unnumbered line: {0}")]
    UnnumberedLine(String),

    /// LOAD found a file that is not program text. The buffer is kept.
    #[error("Not a program file: {0}")]
    NotAProgramFile(String),

    /// No open file under this handle number.
    #[error("Bad file number: {0}")]
    BadFileNumber(u32),

    #[error("Program already running")]
    AlreadyRunning,

    /// The engine asked for input while a request was still outstanding.
    #[error("input request already pending")]
    InputAlreadyPending,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MbtermError {
    /// Whether this error breaks the engine/session contract rather than
    /// being an ordinary user mistake.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InputAlreadyPending)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MbtermError>;
