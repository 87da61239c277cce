//! The terminal session: one value owning the program buffer, the file
//! store, the engine bridge and the history.

use mbterm_types::config::SessionConfig;
use mbterm_types::error::{MbtermError, Result};
use mbterm_types::input::{ESCAPE, InputEvent, InputReply};
use mbterm_vfs::VirtualFileStore;

use crate::bridge::{Controls, ExecutionBridge, RunState};
use crate::dispatch::{Classified, SystemCommand, classify};
use crate::engine::Engine;
use crate::history::HistoryNavigator;
use crate::host::SessionHost;
use crate::program::ProgramBuffer;
use crate::terminal::{RenderEvent, Terminal};

/// Whether a handler already printed its acknowledgment.
enum Ack {
    /// The dispatcher prints `Ok` now.
    Now,
    /// The bridge prints `Ok` when the run ends.
    Deferred,
}

/// A terminal session fronting one engine.
pub struct Session {
    config: SessionConfig,
    engine: Option<Box<dyn Engine>>,
    host: SessionHost,
    buffer: ProgramBuffer,
    bridge: ExecutionBridge,
    history: HistoryNavigator,
}

impl Session {
    /// A session with no engine attached yet. Commands that need one
    /// report `EngineUnavailable`.
    pub fn new(config: SessionConfig, store: VirtualFileStore) -> Self {
        let terminal =
            Terminal::new(config.terminal_width).with_scrollback(config.scrollback_spans);
        Self {
            config,
            engine: None,
            host: SessionHost::new(terminal, store),
            buffer: ProgramBuffer::new(),
            bridge: ExecutionBridge::new(),
            history: HistoryNavigator::new(),
        }
    }

    pub fn with_engine(
        config: SessionConfig,
        store: VirtualFileStore,
        engine: Box<dyn Engine>,
    ) -> Self {
        let mut session = Self::new(config, store);
        session.attach_engine(engine);
        session
    }

    pub fn attach_engine(&mut self, engine: Box<dyn Engine>) {
        if self.engine.is_some() {
            self.detach_engine();
        }
        log::info!("Engine attached");
        self.engine = Some(engine);
    }

    /// Detach the engine, stopping any run in progress first.
    pub fn detach_engine(&mut self) -> Option<Box<dyn Engine>> {
        self.stop();
        let engine = self.engine.take();
        if engine.is_some() {
            log::info!("Engine detached");
        }
        engine
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Print the banner and the first prompt.
    pub fn start(&mut self) {
        for line in &self.config.banner {
            self.host.terminal.println(line);
        }
        self.ack();
    }

    /// Feed one front-end event.
    pub fn handle_event(&mut self, event: InputEvent) -> InputReply {
        match event {
            InputEvent::Submit(line) => {
                self.submit(&line);
                InputReply::SetInputLine(String::new())
            },
            InputEvent::HistoryPrev => match self.history.prev() {
                Some(entry) => InputReply::SetInputLine(entry.to_string()),
                None => InputReply::None,
            },
            InputEvent::HistoryNext => InputReply::SetInputLine(self.history.next().to_string()),
            InputEvent::Escape => {
                self.host.push_key(ESCAPE);
                InputReply::None
            },
            InputEvent::Key(ch) => {
                if self.bridge.is_running() {
                    self.host.push_key(ch);
                } else {
                    log::trace!("key {ch:?} dropped: no program running");
                }
                InputReply::None
            },
        }
    }

    /// Handle a submitted line: answer a pending input request, or run it
    /// as a command.
    pub fn submit(&mut self, line: &str) {
        if self.host.has_pending_input() {
            if let Some(engine) = self.engine.as_deref_mut() {
                self.bridge.resolve_input(engine, &mut self.host, line);
                return;
            }
        }

        self.host.terminal.print(&format!("{line}\n"));
        self.history.record(line);
        if line.trim().is_empty() {
            self.ack();
            return;
        }
        self.dispatch(line);
    }

    /// Interrupt the running program (the stop control).
    pub fn stop(&mut self) {
        if let Some(engine) = self.engine.as_deref_mut() {
            self.bridge.stop(engine, &mut self.host);
        }
    }

    fn dispatch(&mut self, line: &str) {
        let Some(command) = classify(line) else {
            self.ack();
            return;
        };
        log::debug!("dispatch {command:?}");
        match self.execute(command) {
            Ok(Ack::Now) => self.ack(),
            Ok(Ack::Deferred) => {},
            Err(e) => {
                self.report(&e);
                self.ack();
            },
        }
    }

    fn execute(&mut self, command: Classified<'_>) -> Result<Ack> {
        match command {
            Classified::System(SystemCommand::New) => {
                if let Some(engine) = self.engine.as_deref_mut() {
                    engine.clear();
                }
                self.buffer.clear();
                Ok(Ack::Now)
            },
            Classified::System(SystemCommand::List) => {
                for line in self.buffer.lines() {
                    self.host.terminal.println(&line.to_string());
                }
                Ok(Ack::Now)
            },
            Classified::System(SystemCommand::Run) => {
                let engine = self
                    .engine
                    .as_deref_mut()
                    .ok_or(MbtermError::EngineUnavailable)?;
                let source = self.buffer.source();
                self.bridge.run(engine, &mut self.host, &source)?;
                Ok(Ack::Deferred)
            },
            Classified::System(SystemCommand::Cls) => {
                self.host.terminal.clear();
                Ok(Ack::Now)
            },
            Classified::System(SystemCommand::Files) => {
                self.list_files();
                Ok(Ack::Now)
            },
            Classified::Load(name) => {
                let name = non_empty(name)?;
                let source = self.host.store.get(name)?;
                // A rejected file leaves the current program untouched.
                self.buffer = ProgramBuffer::from_source(source).map_err(|e| {
                    log::warn!("LOAD {name}: {e}");
                    MbtermError::NotAProgramFile(name.to_string())
                })?;
                self.host.terminal.println(&format!("Loaded {name}"));
                Ok(Ack::Now)
            },
            Classified::Save(name) => {
                let name = non_empty(name)?;
                self.host.store.set(name, self.buffer.source())?;
                self.host.terminal.println(&format!("Saved {name}"));
                Ok(Ack::Now)
            },
            Classified::NumberedLine(line) => {
                self.buffer.merge(line)?;
                Ok(Ack::Now)
            },
            Classified::Immediate(statement) => {
                let engine = self
                    .engine
                    .as_deref_mut()
                    .ok_or(MbtermError::EngineUnavailable)?;
                self.bridge.evaluate(engine, &mut self.host, statement)?;
                Ok(Ack::Deferred)
            },
        }
    }

    fn list_files(&mut self) {
        let files = self.host.store.list();
        if files.is_empty() {
            self.host.terminal.println("No files");
            return;
        }
        let width = self.config.files_column_width;
        for file in files {
            self.host
                .terminal
                .println(&format!("{:<width$} {} bytes", file.name, file.size));
        }
    }

    fn report(&mut self, error: &MbtermError) {
        log::debug!("command failed: {error}");
        let text = format!("{error}\n");
        match error {
            MbtermError::UnsupportedImmediate => self.host.terminal.print_system(&text),
            _ => self.host.terminal.print_error(&text),
        }
    }

    fn ack(&mut self) {
        self.host.terminal.println("Ok");
    }

    // -- Accessors --

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn terminal(&self) -> &Terminal {
        &self.host.terminal
    }

    /// Render events produced since the last call.
    pub fn take_render_events(&mut self) -> Vec<RenderEvent> {
        self.host.terminal.take_events()
    }

    pub fn store(&self) -> &VirtualFileStore {
        &self.host.store
    }

    pub fn store_mut(&mut self) -> &mut VirtualFileStore {
        &mut self.host.store
    }

    pub fn buffer(&self) -> &ProgramBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryNavigator {
        &self.history
    }

    pub fn host(&self) -> &SessionHost {
        &self.host
    }

    pub fn run_state(&self) -> RunState {
        self.bridge.state()
    }

    pub fn is_running(&self) -> bool {
        self.bridge.is_running()
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.host.has_pending_input()
    }

    pub fn controls(&self) -> Controls {
        self.bridge.controls()
    }

    /// Prompt text next to the input line: empty while a program runs.
    pub fn prompt(&self) -> &'static str {
        if self.bridge.is_running() { "" } else { "Ok" }
    }

    /// Tear the session down, keeping the file store.
    pub fn into_store(mut self) -> VirtualFileStore {
        self.detach_engine();
        self.host.store
    }
}

fn non_empty(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        Err(MbtermError::BadFileName)
    } else {
        Ok(name)
    }
}
