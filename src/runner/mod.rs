//! External command execution.
//!
//! Every interaction with the operating system's tools goes through a
//! [`CommandRunner`]. Failures are values, not panics: probing for a tool
//! that is not installed is an ordinary outcome, so callers match on the
//! returned [`CommandError`] and substitute their own defaults.

pub mod scripted;

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

pub use scripted::ScriptedRunner;

/// Shell used to interpret command lines
pub const DEFAULT_SHELL: &str = "/bin/bash";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum CommandError {
    /// The command ran and exited with a non-zero status
    #[error("'{command}' exited with code {exit_code}: {}", stderr.trim())]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The shell process could not be started
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child process failed
    #[error("failed waiting on '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran longer than the runner allows and was killed
    #[error("'{command}' timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    /// The runner's cancel token fired while the command was running
    #[error("'{command}' was cancelled")]
    Cancelled { command: String },

    /// The process was terminated by a signal
    #[error("'{command}' was terminated by a signal")]
    Terminated { command: String },
}

impl CommandError {
    /// Launch failures mean the execution mechanism itself is broken,
    /// every other variant only means "no data from this command".
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Launch { .. } | CommandError::Wait { .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::NonZeroExit { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Runs a fully assembled command line and returns its standard output.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> Result<String, CommandError>;

    /// Standard output on success, `None` on any failure
    fn output(&self, command_line: &str) -> Option<String> {
        self.run(command_line).ok()
    }
}

/// Shared flag used to abort whatever command is currently running
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs commands through `/bin/bash -c`, one process at a time.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            timeout: None,
            cancel: None,
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_bounded(&self) -> bool {
        self.timeout.is_some() || self.cancel.is_some()
    }

    /// Kill the command's process group if it was cancelled or ran past the deadline
    fn enforce_limits(
        &self,
        child: &mut Child,
        command_line: &str,
        deadline: Option<Instant>,
    ) -> Result<(), CommandError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            kill(child);
            return Err(CommandError::Cancelled {
                command: command_line.to_string(),
            });
        }

        if let (Some(limit), Some(deadline)) = (self.timeout, deadline) {
            if Instant::now() >= deadline {
                kill(child);
                warn!(command = command_line, ?limit, "command timed out");
                return Err(CommandError::TimedOut {
                    command: command_line.to_string(),
                    timeout: limit,
                });
            }
        }
        Ok(())
    }

    fn wait(
        &self,
        child: &mut Child,
        command_line: &str,
        deadline: Option<Instant>,
    ) -> Result<ExitStatus, CommandError> {
        let wait_err = |source| CommandError::Wait {
            command: command_line.to_string(),
            source,
        };

        if !self.is_bounded() {
            return child.wait().map_err(wait_err);
        }

        loop {
            if let Some(status) = child.try_wait().map_err(wait_err)? {
                return Ok(status);
            }
            self.enforce_limits(child, command_line, deadline)?;
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Collect both pipes. Background processes started by the command can
    /// hold them open after the shell has exited, so draining obeys the same
    /// deadline and cancel token as the wait.
    fn drain(
        &self,
        rx: &Receiver<(Stream, String)>,
        mut pending: usize,
        child: &mut Child,
        command_line: &str,
        deadline: Option<Instant>,
    ) -> Result<Captured, CommandError> {
        let mut captured = Captured::default();

        while pending > 0 {
            let received = if self.is_bounded() {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => {
                        self.enforce_limits(child, command_line, deadline)?;
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                }
            };

            match received {
                (Stream::Stdout, text) => captured.stdout = text,
                (Stream::Stderr, text) => captured.stderr = text,
            }
            pending -= 1;
        }
        Ok(captured)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<String, CommandError> {
        debug!(command = command_line, "running command");

        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // own group, so a kill also reaches anything the command backgrounds
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(|source| {
            warn!(command = command_line, error = %source, "failed to launch shell");
            CommandError::Launch {
                command: command_line.to_string(),
                source,
            }
        })?;
        let deadline = self.timeout.map(|limit| Instant::now() + limit);

        // Drain both pipes concurrently so a chatty stderr cannot block the child.
        let (tx, rx) = mpsc::channel();
        let pending = usize::from(spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone()))
            + usize::from(spawn_reader(child.stderr.take(), Stream::Stderr, tx));

        let status = self.wait(&mut child, command_line, deadline)?;
        let captured = self.drain(&rx, pending, &mut child, command_line, deadline)?;

        match status.code() {
            Some(0) => Ok(captured.stdout),
            Some(exit_code) => {
                debug!(
                    command = command_line,
                    exit_code,
                    stderr = captured.stderr.trim(),
                    "command failed"
                );
                Err(CommandError::NonZeroExit {
                    command: command_line.to_string(),
                    exit_code,
                    stderr: captured.stderr,
                })
            }
            None => Err(CommandError::Terminated {
                command: command_line.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Default)]
struct Captured {
    stdout: String,
    stderr: String,
}

fn kill(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: signals only the process group created for this child at spawn
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Read a pipe to the end on its own thread and report it on `tx`.
/// Returns whether a reader was started.
fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
    stream: Stream,
    tx: Sender<(Stream, String)>,
) -> bool {
    let Some(mut pipe) = pipe else {
        return false;
    };
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
    true
}

/// Quote a single argument for interpolation into a shell command line
pub fn shell_quote(arg: &str) -> String {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@+=,%".contains(c));
    if is_plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
