//! Classification of submitted lines.
//!
//! Keywords are matched case-insensitively on the trimmed line; everything
//! that is passed on (file names, program lines, statements) keeps the
//! user's original text.

/// The fixed set of argument-less system commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    New,
    List,
    Run,
    Cls,
    Files,
}

impl SystemCommand {
    /// Look up an exact keyword, ignoring ASCII case.
    pub fn parse(word: &str) -> Option<Self> {
        const TABLE: [(&str, SystemCommand); 5] = [
            ("NEW", SystemCommand::New),
            ("LIST", SystemCommand::List),
            ("RUN", SystemCommand::Run),
            ("CLS", SystemCommand::Cls),
            ("FILES", SystemCommand::Files),
        ];
        TABLE
            .iter()
            .find(|(name, _)| word.eq_ignore_ascii_case(name))
            .map(|&(_, cmd)| cmd)
    }
}

/// What a submitted line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<'a> {
    System(SystemCommand),
    Load(&'a str),
    Save(&'a str),
    /// Digit-prefixed program line, trimmed but otherwise untouched.
    NumberedLine(&'a str),
    /// Anything else, for the engine's immediate mode.
    Immediate(&'a str),
}

/// Classify one submitted line. `None` for blank input.
pub fn classify(raw: &str) -> Option<Classified<'_>> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(cmd) = SystemCommand::parse(line) {
        return Some(Classified::System(cmd));
    }
    if let Some(rest) = strip_keyword(line, "LOAD") {
        return Some(Classified::Load(file_name(rest)));
    }
    if let Some(rest) = strip_keyword(line, "SAVE") {
        return Some(Classified::Save(file_name(rest)));
    }
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(Classified::NumberedLine(line));
    }
    Some(Classified::Immediate(line))
}

/// `keyword` followed by one space, case-insensitively; returns the rest.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let word = line.get(..keyword.len())?;
    if !word.eq_ignore_ascii_case(keyword) {
        return None;
    }
    line[keyword.len()..].strip_prefix(' ')
}

/// Trim and drop one pair of surrounding quotes (or a lone opening quote,
/// as in `LOAD "GAME.BAS`).
fn file_name(rest: &str) -> &str {
    let rest = rest.trim();
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    rest.strip_suffix('"').unwrap_or(rest)
}
