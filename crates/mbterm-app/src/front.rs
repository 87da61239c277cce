//! Line-mode front end: command-line arguments, `:` meta commands and
//! rendering session output to a byte stream.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use mbterm_session::{RenderEvent, Session, Style};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Parsed command line: `[config.toml] [--import <path>]...`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub imports: Vec<PathBuf>,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--import" {
                let Some(path) = args.next() else {
                    bail!("--import needs a path");
                };
                parsed.imports.push(PathBuf::from(path));
            } else if arg.starts_with("--") {
                bail!("unknown option {arg}");
            } else if parsed.config.is_none() {
                parsed.config = Some(PathBuf::from(arg));
            } else {
                bail!("unexpected argument {arg}");
            }
        }
        Ok(parsed)
    }
}

/// Read files from disk as `(store name, contents)` pairs. The store name
/// is the path's final component.
pub fn read_imports(paths: &[PathBuf]) -> Result<Vec<(String, String)>> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .with_context(|| format!("{} has no file name", path.display()))?
                .to_string_lossy()
                .into_owned();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok((name, content))
        })
        .collect()
}

/// Write render events to `out`. Error spans get a `?` prefix so they
/// stand out on a plain terminal.
pub fn render<W: Write>(events: &[RenderEvent], out: &mut W) -> io::Result<()> {
    for event in events {
        match event {
            RenderEvent::Print(span) => {
                if span.style == Style::Error {
                    out.write_all(b"?")?;
                }
                out.write_all(span.text.as_bytes())?;
            },
            RenderEvent::Clear => out.write_all(CLEAR_SCREEN.as_bytes())?,
        }
    }
    out.flush()
}

/// Run a `:` meta command. Returns the message to show.
///
/// - `:export <name> <path>` writes a store entry to disk
/// - `:save [path]` writes the program listing to disk
/// - `:stop` interrupts the running program
pub fn meta_command(session: &mut Session, line: &str) -> Result<String> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some(":export") => {
            let (Some(name), Some(path)) = (words.next(), words.next()) else {
                bail!("usage: :export <name> <path>");
            };
            let artifact = session.store().export(name)?;
            write_file(Path::new(path), &artifact.content)?;
            Ok(format!(
                "Exported {} ({}) to {path}",
                artifact.file_name, artifact.mime_type
            ))
        },
        Some(":save") => {
            let path = words
                .next()
                .map(str::to_string)
                .unwrap_or_else(|| session.config().default_save_name.clone());
            write_file(Path::new(&path), &session.buffer().source())?;
            Ok(format!("Wrote program to {path}"))
        },
        Some(":stop") => {
            session.stop();
            Ok(String::new())
        },
        Some(other) => bail!("unknown meta command {other}"),
        None => bail!("empty meta command"),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
