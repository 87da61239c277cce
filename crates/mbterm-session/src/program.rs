//! Numbered-line program buffer.
//!
//! The buffer is the editor's view of the program: one entry per line
//! number, always sorted ascending. Typing a numbered line merges it in;
//! typing just the number deletes that line.

use std::fmt;

use mbterm_types::error::{MbtermError, Result};

/// One program line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLine {
    pub number: u32,
    /// Statement text after the number, trimmed. Never empty.
    pub text: String,
}

impl fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.text)
    }
}

/// What a merge did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced,
    Deleted,
    /// Bare number for a line that does not exist.
    Unchanged,
}

/// The program being edited, sorted by line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBuffer {
    lines: Vec<ProgramLine>,
}

impl ProgramBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a buffer from stored program text.
    ///
    /// Blank lines are ignored. Any other line must start with a line
    /// number that fits, otherwise the whole text is rejected.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut buffer = Self::new();
        for raw in source.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(MbtermError::UnnumberedLine(line.to_string()));
            }
            buffer.merge(line)?;
        }
        Ok(buffer)
    }

    /// Merge a numbered line into the buffer.
    ///
    /// The caller guarantees `line` starts with a digit once trimmed. A
    /// number that overflows `u32` is rejected and leaves the buffer as is.
    pub fn merge(&mut self, line: &str) -> Result<MergeOutcome> {
        let (number, text) = split_number(line)?;
        let outcome = match self.lines.binary_search_by_key(&number, |l| l.number) {
            Ok(idx) if text.is_empty() => {
                self.lines.remove(idx);
                MergeOutcome::Deleted
            },
            Ok(idx) => {
                self.lines[idx].text = text.to_string();
                MergeOutcome::Replaced
            },
            Err(_) if text.is_empty() => MergeOutcome::Unchanged,
            Err(idx) => {
                self.lines.insert(
                    idx,
                    ProgramLine {
                        number,
                        text: text.to_string(),
                    },
                );
                MergeOutcome::Inserted
            },
        };
        log::trace!("merge line {number}: {outcome:?}");
        Ok(outcome)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn get(&self, number: u32) -> Option<&ProgramLine> {
        self.lines
            .binary_search_by_key(&number, |l| l.number)
            .ok()
            .map(|idx| &self.lines[idx])
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The listing, one `<number> <text>` per line, newline separated.
    pub fn source(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Split `line` into its leading line number and the trimmed remainder.
fn split_number(line: &str) -> Result<(u32, &str)> {
    let line = line.trim();
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let digits = &line[..digits_end];
    let number = digits
        .parse::<u32>()
        .map_err(|_| MbtermError::LineNumberOutOfRange(digits.to_string()))?;
    Ok((number, line[digits_end..].trim()))
}
