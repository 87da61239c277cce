//! Terminal output model.
//!
//! The session never draws anything. It appends styled spans here and
//! queues render events that a front end drains and paints however it
//! likes.

use std::mem;

/// Tab stops every 8 columns.
const TAB_WIDTH: usize = 8;

/// Spans kept by [`Terminal::new`].
pub const DEFAULT_SCROLLBACK: usize = 2000;

/// How a span should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Error,
    /// Notices from the session itself rather than the program.
    System,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

/// Something a front end has to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Print(Span),
    Clear,
}

/// Screen contents, pending render events and the print column.
#[derive(Debug, Clone)]
pub struct Terminal {
    spans: Vec<Span>,
    events: Vec<RenderEvent>,
    column: usize,
    width: usize,
    scrollback: usize,
}

impl Terminal {
    pub fn new(width: u16) -> Self {
        Self {
            spans: Vec::new(),
            events: Vec::new(),
            column: 0,
            width: usize::from(width.max(1)),
            scrollback: DEFAULT_SCROLLBACK,
        }
    }

    /// Keep at most `limit` spans on screen; 0 means no limit.
    pub fn with_scrollback(mut self, limit: usize) -> Self {
        self.scrollback = limit;
        self.trim_scrollback();
        self
    }

    /// Change the wrap column. The current column is clamped into range.
    pub fn set_width(&mut self, width: u16) {
        self.width = usize::from(width.max(1));
        if self.column >= self.width {
            self.column = 0;
        }
    }

    /// Append program or command output verbatim.
    pub fn print(&mut self, text: &str) {
        self.push(Style::Normal, text);
    }

    pub fn print_error(&mut self, text: &str) {
        self.push(Style::Error, text);
    }

    pub fn print_system(&mut self, text: &str) {
        self.push(Style::System, text);
    }

    /// Append `text` and a newline.
    pub fn println(&mut self, text: &str) {
        self.print(&format!("{text}\n"));
    }

    /// Wipe the screen.
    pub fn clear(&mut self) {
        self.spans.clear();
        self.column = 0;
        self.events.push(RenderEvent::Clear);
    }

    /// Everything currently on screen as plain text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Hand pending render events to the front end.
    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        mem::take(&mut self.events)
    }

    /// Column the next printed character lands in.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The user just finished an input line, so the cursor is at column 0.
    pub fn reset_column(&mut self) {
        self.column = 0;
    }

    fn push(&mut self, style: Style, text: &str) {
        if text.is_empty() {
            return;
        }
        self.advance_column(text);
        let span = Span {
            style,
            text: text.to_string(),
        };
        self.spans.push(span.clone());
        self.events.push(RenderEvent::Print(span));
        self.trim_scrollback();
    }

    fn trim_scrollback(&mut self) {
        if self.scrollback > 0 && self.spans.len() > self.scrollback {
            let excess = self.spans.len() - self.scrollback;
            self.spans.drain(..excess);
        }
    }

    fn advance_column(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' | '\r' => self.column = 0,
                '\t' => self.column = (self.column / TAB_WIDTH + 1) * TAB_WIDTH,
                _ => {
                    self.column += 1;
                    if self.column >= self.width {
                        self.column = 0;
                    }
                },
            }
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new(80)
    }
}
