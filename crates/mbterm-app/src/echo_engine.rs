//! Stand-in engine for running the terminal without a BASIC interpreter.
//!
//! Each program line's statement text is printed as-is. A statement that is
//! exactly `INPUT` asks for a line and prints it back.

use mbterm_session::{Engine, EngineHost, ExecOutcome};

#[derive(Debug, Default)]
pub struct EchoEngine {
    statements: Vec<String>,
    pc: usize,
    interrupted: bool,
}

impl EchoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn drive(&mut self, host: &mut dyn EngineHost) -> ExecOutcome {
        while self.pc < self.statements.len() {
            if self.interrupted {
                return ExecOutcome::Interrupted;
            }
            let stmt = &self.statements[self.pc];
            self.pc += 1;
            if stmt.eq_ignore_ascii_case("INPUT") {
                if let Err(e) = host.request_input("? ") {
                    return ExecOutcome::Failed(e.to_string());
                }
                return ExecOutcome::AwaitingInput;
            }
            host.print(&format!("{stmt}\n"));
        }
        ExecOutcome::Completed
    }
}

impl Engine for EchoEngine {
    fn load(&mut self, source: &str) -> Result<(), String> {
        let mut statements = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            let digits = line.find(|c: char| !c.is_ascii_digit()).unwrap_or(line.len());
            if digits == 0 {
                return Err(format!("Syntax error in line {}: missing line number", idx + 1));
            }
            statements.push(line[digits..].trim().to_string());
        }
        log::debug!("echo engine loaded {} statement(s)", statements.len());
        self.statements = statements;
        self.pc = 0;
        self.interrupted = false;
        Ok(())
    }

    fn execute(&mut self, host: &mut dyn EngineHost) -> ExecOutcome {
        self.pc = 0;
        self.drive(host)
    }

    fn resume(&mut self, line: &str, host: &mut dyn EngineHost) -> ExecOutcome {
        host.print(&format!("{line}\n"));
        self.drive(host)
    }

    fn interrupt(&mut self) {
        self.interrupted = true;
    }

    fn clear(&mut self) {
        self.statements.clear();
        self.pc = 0;
    }
}
