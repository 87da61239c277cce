//! Run/stop state machine between the terminal and the engine.
//!
//! ```text
//! Idle --run--> Running --completion--> Idle
//!                  |  ^
//!      input request  | resolve(line)
//!                  v  |
//!               (suspended, still Running)
//!                  |
//!                stop --> Stopped
//! ```
//!
//! Suspension never blocks: the engine returns `AwaitingInput`, the bridge
//! leaves the continuation in the host, and control goes back to the event
//! loop until the user submits a line.

use mbterm_types::error::{MbtermError, Result};

use crate::engine::{Engine, ExecOutcome};
use crate::host::SessionHost;

/// Where the bridge is in a run/stop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// Ended by `stop()`. Behaves like `Idle` for the UI.
    Stopped,
}

/// Enabled state of the run and stop controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub run_enabled: bool,
    pub stop_enabled: bool,
}

/// What started the current run; decides how completion is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Program,
    Immediate,
}

#[derive(Debug)]
pub struct ExecutionBridge {
    state: RunState,
    origin: Origin,
}

impl ExecutionBridge {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            origin: Origin::Program,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn controls(&self) -> Controls {
        Controls {
            run_enabled: !self.is_running(),
            stop_enabled: self.is_running(),
        }
    }

    /// Load `source` into the engine and execute it.
    ///
    /// Errors leave the bridge where it was. Once execution starts the
    /// acknowledgment is the bridge's job: it prints `Ok` when the run
    /// completes or is stopped.
    pub fn run(
        &mut self,
        engine: &mut dyn Engine,
        host: &mut SessionHost,
        source: &str,
    ) -> Result<()> {
        if self.is_running() {
            return Err(MbtermError::AlreadyRunning);
        }
        if source.trim().is_empty() {
            return Err(MbtermError::EmptyProgram);
        }
        host.terminal.print("\n");
        engine.load(source).map_err(MbtermError::LoadError)?;
        self.enter(Origin::Program, host);
        let outcome = engine.execute(host);
        self.settle(outcome, engine, host);
        Ok(())
    }

    /// Evaluate an immediate statement.
    pub fn evaluate(
        &mut self,
        engine: &mut dyn Engine,
        host: &mut SessionHost,
        statement: &str,
    ) -> Result<()> {
        if self.is_running() {
            return Err(MbtermError::AlreadyRunning);
        }
        self.enter(Origin::Immediate, host);
        match engine.evaluate(statement, host) {
            Some(outcome) => {
                self.settle(outcome, engine, host);
                Ok(())
            },
            None => {
                self.state = RunState::Idle;
                Err(MbtermError::UnsupportedImmediate)
            },
        }
    }

    /// Answer the pending input request with `text` and resume the engine.
    /// Returns `false` when nothing was waiting.
    pub fn resolve_input(
        &mut self,
        engine: &mut dyn Engine,
        host: &mut SessionHost,
        text: &str,
    ) -> bool {
        let Some(continuation) = host.take_pending() else {
            return false;
        };
        host.terminal.print(&format!("{text}\n"));
        host.terminal.reset_column();
        let answer = continuation.resolve(text);
        log::debug!("resuming after input request {}", answer.request);
        let outcome = engine.resume(&answer.text, host);
        self.settle(outcome, engine, host);
        true
    }

    /// Interrupt a running program. No-op unless running.
    pub fn stop(&mut self, engine: &mut dyn Engine, host: &mut SessionHost) -> bool {
        if !self.is_running() {
            log::debug!("stop ignored: nothing running");
            return false;
        }
        engine.interrupt();
        host.take_pending();
        host.close_all_files();
        self.state = RunState::Stopped;
        log::debug!("bridge: Running -> Stopped");
        host.terminal.print("\nBreak\nOk\n");
        true
    }

    fn enter(&mut self, origin: Origin, host: &mut SessionHost) {
        self.state = RunState::Running;
        self.origin = origin;
        // Keys typed before the run are not for this program.
        host.clear_keys();
        log::debug!("bridge: Idle -> Running ({origin:?})");
    }

    fn settle(&mut self, outcome: ExecOutcome, engine: &mut dyn Engine, host: &mut SessionHost) {
        if host.take_violation() {
            log::error!("engine broke the single input request contract; ending run");
            engine.interrupt();
            host.take_pending();
            host.terminal
                .print_error(&format!("\n{}\n", MbtermError::InputAlreadyPending));
            self.finish(host);
            return;
        }
        match outcome {
            ExecOutcome::AwaitingInput => {
                host.ensure_pending();
                log::debug!("bridge: suspended on input");
            },
            ExecOutcome::Completed => self.finish(host),
            ExecOutcome::Failed(message) => {
                host.terminal.print(&format!("\n{message}\n"));
                self.finish(host);
            },
            ExecOutcome::Interrupted => {
                host.take_pending();
                host.close_all_files();
                self.state = RunState::Stopped;
                log::debug!("bridge: Running -> Stopped (engine)");
                host.terminal.print("\nBreak\nOk\n");
            },
        }
    }

    fn finish(&mut self, host: &mut SessionHost) {
        host.take_pending();
        host.close_all_files();
        self.state = RunState::Idle;
        log::debug!("bridge: Running -> Idle");
        match self.origin {
            Origin::Program => host.terminal.print("\nOk\n"),
            Origin::Immediate => host.terminal.print("Ok\n"),
        }
    }
}

impl Default for ExecutionBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineHost;
    use crate::terminal::Terminal;
    use mbterm_vfs::{OpenMode, VirtualFileStore};

    /// Engine that runs a fixed list of steps: print text, or ask for input
    /// and print what it gets back.
    #[derive(Default)]
    struct Scripted {
        loaded: Vec<String>,
        pc: usize,
        interrupted: bool,
        reject: Option<String>,
        double_request: bool,
    }

    impl Scripted {
        fn drive(&mut self, host: &mut dyn EngineHost) -> ExecOutcome {
            while self.pc < self.loaded.len() {
                if self.interrupted {
                    return ExecOutcome::Interrupted;
                }
                let step = self.loaded[self.pc].clone();
                self.pc += 1;
                if step == "INPUT" {
                    host.request_input("? ").unwrap();
                    if self.double_request && host.request_input("?? ").is_err() {
                        return ExecOutcome::Failed("engine confused".into());
                    }
                    return ExecOutcome::AwaitingInput;
                }
                if step == "OPEN" {
                    let f = host.open_file("LEFT.TXT", OpenMode::Output, 0).unwrap();
                    host.write_file(f, "unclosed").unwrap();
                    continue;
                }
                if step == "FAIL" {
                    return ExecOutcome::Failed("Runtime error at line 1".into());
                }
                host.print(&format!("{step}\n"));
            }
            ExecOutcome::Completed
        }
    }

    impl Engine for Scripted {
        fn load(&mut self, source: &str) -> std::result::Result<(), String> {
            if let Some(msg) = &self.reject {
                return Err(msg.clone());
            }
            self.loaded = source.lines().map(str::to_string).collect();
            self.pc = 0;
            Ok(())
        }
        fn execute(&mut self, host: &mut dyn EngineHost) -> ExecOutcome {
            self.drive(host)
        }
        fn resume(&mut self, line: &str, host: &mut dyn EngineHost) -> ExecOutcome {
            host.print(&format!("GOT [{line}]\n"));
            self.drive(host)
        }
        fn interrupt(&mut self) {
            self.interrupted = true;
        }
        fn clear(&mut self) {
            self.loaded.clear();
        }
    }

    fn host() -> SessionHost {
        SessionHost::new(Terminal::default(), VirtualFileStore::new())
    }

    #[test]
    fn starts_idle_with_run_enabled() {
        let bridge = ExecutionBridge::new();
        assert_eq!(bridge.state(), RunState::Idle);
        assert_eq!(
            bridge.controls(),
            Controls {
                run_enabled: true,
                stop_enabled: false
            }
        );
    }

    #[test]
    fn empty_program_does_not_transition() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        let err = bridge.run(&mut engine, &mut h, "  \n ").unwrap_err();
        assert!(matches!(err, MbtermError::EmptyProgram));
        assert_eq!(bridge.state(), RunState::Idle);
    }

    #[test]
    fn load_error_stays_idle_with_message() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted {
            reject: Some("Parse error at line 1, col 4: expected THEN".into()),
            ..Default::default()
        };
        let mut h = host();
        match bridge.run(&mut engine, &mut h, "10 IF X").unwrap_err() {
            MbtermError::LoadError(msg) => {
                assert_eq!(msg, "Parse error at line 1, col 4: expected THEN");
            },
            other => panic!("expected LoadError, got {other:?}"),
        }
        assert_eq!(bridge.state(), RunState::Idle);
    }

    #[test]
    fn completion_returns_to_idle_with_ok() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "HELLO").unwrap();
        assert_eq!(bridge.state(), RunState::Idle);
        assert_eq!(h.terminal.text(), "\nHELLO\n\nOk\n");
        assert!(bridge.controls().run_enabled);
    }

    #[test]
    fn input_request_suspends_and_resumes_literally() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "INPUT\nDONE").unwrap();
        assert!(bridge.is_running());
        assert!(h.has_pending_input());
        assert_eq!(
            bridge.controls(),
            Controls {
                run_enabled: false,
                stop_enabled: true
            }
        );

        assert!(bridge.resolve_input(&mut engine, &mut h, "  hello   World "));
        assert!(h.terminal.text().contains("GOT [  hello   World ]"));
        assert_eq!(bridge.state(), RunState::Idle);
        assert!(!h.has_pending_input());
        assert!(h.terminal.text().ends_with("DONE\n\nOk\n"));
    }

    #[test]
    fn resolve_without_pending_is_refused() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        assert!(!bridge.resolve_input(&mut engine, &mut h, "x"));
    }

    #[test]
    fn stop_while_waiting_drops_continuation() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "INPUT").unwrap();
        assert!(bridge.stop(&mut engine, &mut h));
        assert_eq!(bridge.state(), RunState::Stopped);
        assert!(engine.interrupted);
        assert!(!h.has_pending_input());
        assert!(h.terminal.text().ends_with("\nBreak\nOk\n"));
        assert!(bridge.controls().run_enabled);
        assert!(!bridge.controls().stop_enabled);
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        assert!(!bridge.stop(&mut engine, &mut h));
        assert_eq!(h.terminal.text(), "");
        assert!(!engine.interrupted);
    }

    #[test]
    fn runtime_failure_prints_message_then_ok() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "A\nFAIL\nB").unwrap();
        assert_eq!(bridge.state(), RunState::Idle);
        assert_eq!(
            h.terminal.text(),
            "\nA\n\nRuntime error at line 1\n\nOk\n"
        );
    }

    #[test]
    fn double_request_ends_run() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted {
            double_request: true,
            ..Default::default()
        };
        let mut h = host();
        bridge.run(&mut engine, &mut h, "INPUT").unwrap();
        assert_eq!(bridge.state(), RunState::Idle);
        assert!(!h.has_pending_input());
        assert!(engine.interrupted);
        assert!(h.terminal.text().contains("input request already pending"));
    }

    #[test]
    fn run_while_running_is_refused() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "INPUT").unwrap();
        assert!(matches!(
            bridge.run(&mut engine, &mut h, "X"),
            Err(MbtermError::AlreadyRunning)
        ));
    }

    #[test]
    fn immediate_unsupported_by_default() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        let err = bridge.evaluate(&mut engine, &mut h, "PRINT 1").unwrap_err();
        assert!(matches!(err, MbtermError::UnsupportedImmediate));
        assert_eq!(bridge.state(), RunState::Idle);
    }

    #[test]
    fn completion_commits_files_left_open() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "OPEN").unwrap();
        assert_eq!(h.open_files(), 0);
        assert_eq!(h.store.get("LEFT.TXT").unwrap(), "unclosed");
    }

    #[test]
    fn stop_commits_files_left_open() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        bridge.run(&mut engine, &mut h, "OPEN\nINPUT").unwrap();
        assert_eq!(h.open_files(), 1);
        bridge.stop(&mut engine, &mut h);
        assert_eq!(h.open_files(), 0);
        assert_eq!(h.store.get("LEFT.TXT").unwrap(), "unclosed");
    }

    #[test]
    fn keys_from_before_run_are_discarded() {
        let mut bridge = ExecutionBridge::new();
        let mut engine = Scripted::default();
        let mut h = host();
        h.push_key('x');
        bridge.run(&mut engine, &mut h, "INPUT").unwrap();
        assert_eq!(h.buffered_keys(), 0);
    }
}
