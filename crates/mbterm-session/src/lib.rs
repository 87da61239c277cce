//! Session layer for an MBASIC-style terminal.
//!
//! Sits between a line-oriented front end and an external
//! statement-execution engine. A [`Session`] owns:
//!
//! - the line-numbered program buffer and its merge rules
//! - command dispatch (`NEW`, `LIST`, `RUN`, `CLS`, `FILES`, `LOAD`, `SAVE`)
//! - the execution bridge (run/stop, suspension on input requests)
//! - command history
//! - the terminal output model
//!
//! The engine is reached only through the [`Engine`] and [`EngineHost`]
//! traits. Everything runs on one thread; input suspension is a returned
//! [`ExecOutcome::AwaitingInput`], never a blocked call.

pub mod bridge;
pub mod dispatch;
pub mod engine;
pub mod history;
pub mod host;
pub mod program;
mod session;
pub mod terminal;

pub use bridge::{Controls, ExecutionBridge, RunState};
pub use engine::{Engine, EngineHost, ExecOutcome, FileHandle};
pub use host::{Continuation, InputLine, SessionHost};
pub use program::{MergeOutcome, ProgramBuffer, ProgramLine};
pub use session::Session;
pub use terminal::{DEFAULT_SCROLLBACK, RenderEvent, Span, Style, Terminal};
