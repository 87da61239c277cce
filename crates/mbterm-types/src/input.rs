//! Platform-agnostic input events.
//!
//! Every front end maps its native keyboard handling to these. The session
//! never sees raw key codes.

/// ASCII escape, buffered when Escape is pressed in the input line.
pub const ESCAPE: char = '\u{1b}';

/// A front-end input event addressed to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A full line was entered in the main input line.
    Submit(String),
    /// Recall the previous history entry (arrow up).
    HistoryPrev,
    /// Recall the next history entry (arrow down).
    HistoryNext,
    /// Escape pressed in the main input line.
    Escape,
    /// A printable key typed outside the main input line.
    Key(char),
}

/// What the front end should do after handing an event to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputReply {
    /// Nothing to change in the input line.
    None,
    /// Replace the input line contents with this text.
    SetInputLine(String),
}
