use std::cell::RefCell;
use std::collections::HashMap;

use super::{CommandError, CommandRunner};

#[derive(Debug, Clone)]
enum Response {
    Stdout(String),
    Exit(i32, String),
    LaunchFailure,
}

/// A [`CommandRunner`] that answers from a fixed table instead of spawning
/// processes. Unknown commands exit 127, the way bash reports a missing tool.
/// Every command line it receives is recorded for later inspection.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, Response>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with exit status 0 and the given stdout
    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Response::Stdout(stdout.to_string()));
        self
    }

    /// Answer `command` with a non-zero exit status
    pub fn fail(mut self, command: &str, exit_code: i32, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            Response::Exit(exit_code, stderr.to_string()),
        );
        self
    }

    /// Answer `command` as if the shell itself could not be started
    pub fn launch_failure(mut self, command: &str) -> Self {
        self.responses
            .insert(command.to_string(), Response::LaunchFailure);
        self
    }

    /// Command lines received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command_line: &str) -> Result<String, CommandError> {
        self.calls.borrow_mut().push(command_line.to_string());

        match self.responses.get(command_line) {
            Some(Response::Stdout(out)) => Ok(out.clone()),
            Some(Response::Exit(code, stderr)) => Err(CommandError::NonZeroExit {
                command: command_line.to_string(),
                exit_code: *code,
                stderr: stderr.clone(),
            }),
            Some(Response::LaunchFailure) => Err(CommandError::Launch {
                command: command_line.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "shell not found"),
            }),
            None => Err(CommandError::NonZeroExit {
                command: command_line.to_string(),
                exit_code: 127,
                stderr: format!("bash: {}: command not found", command_line),
            }),
        }
    }
}
