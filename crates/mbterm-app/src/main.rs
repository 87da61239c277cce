//! mbterm line-mode entry point.
//!
//! Reads lines from stdin and feeds them to a session running the echo
//! engine. Lines starting with `:` are front-end commands (`:export`,
//! `:save`, `:stop`). Config comes from `MBTERM_CONFIG` or the first
//! argument; `--import <path>` preloads files into the store.

mod echo_engine;
mod front;

use std::io::{self, BufRead, Write};

use anyhow::Result;

use echo_engine::EchoEngine;
use front::Args;
use mbterm_session::Session;
use mbterm_types::config::SessionConfig;
use mbterm_types::input::InputEvent;
use mbterm_vfs::VirtualFileStore;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;

    // Resolve config from MBTERM_CONFIG or CLI arg, else defaults.
    let config_path = std::env::var_os("MBTERM_CONFIG")
        .map(Into::into)
        .or(args.config.clone());
    let config = match &config_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    log::info!("Starting mbterm ({} columns)", config.terminal_width);

    let mut store = VirtualFileStore::new();
    if let Some(path) = &config.snapshot_path {
        let restored = store.load_snapshot(path)?;
        log::info!("Restored {restored} file(s) from {}", path.display());
    }
    if !args.imports.is_empty() {
        store.import(front::read_imports(&args.imports)?)?;
    }

    let snapshot_path = config.snapshot_path.clone();
    let mut session = Session::with_engine(config, store, Box::new(EchoEngine::new()));
    session.start();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    front::render(&session.take_render_events(), &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.starts_with(':') {
            match front::meta_command(&mut session, &line) {
                Ok(msg) if msg.is_empty() => {},
                Ok(msg) => writeln!(out, "{msg}")?,
                Err(e) => {
                    log::warn!("{e:#}");
                    writeln!(out, "?{e:#}")?;
                },
            }
        } else {
            session.handle_event(InputEvent::Submit(line));
        }
        front::render(&session.take_render_events(), &mut out)?;
    }

    if let Some(path) = snapshot_path {
        session.store().save_snapshot(&path)?;
    }
    log::info!("mbterm shutting down");
    Ok(())
}
