//! Blocking external command runner
//!
//! Provides synchronous command execution with:
//! - Interactive mode (streams inherited from the terminal)
//! - Capture mode (stdout/stderr collected as text)
//! - Distinct errors for "tool missing" and "tool reported failure"

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use super::shell_escape;
use crate::error::{Error, Result};

/// How a command's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Inherit the terminal's streams and block until the command exits
    Interactive,
    /// Collect stdout and stderr into the outcome
    Capture,
    /// Collect stdout only; stderr stays on the terminal.
    ///
    /// Used for the fuzzy finder, which draws its interface there.
    CaptureStdout,
}

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub mode: Mode,
    /// Text written to the command's stdin. `None` inherits (interactive) or closes it.
    pub stdin: Option<String>,
}

impl CommandSpec {
    /// A capture-mode command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            mode: Mode::Capture,
            stdin: None,
        }
    }

    /// Shorthand for `CommandSpec::new("git").args(args)`
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git").args(args)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn interactive(self) -> Self {
        self.mode(Mode::Interactive)
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Human-readable command line, shell-quoted where needed
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_escape)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a command that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Display form of the command, kept for error messages
    pub command: String,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    /// A zero exit with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// A non-zero exit with the given stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into `Error::CommandFailed`
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                command: self.command,
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Executes external commands
///
/// Handlers only ever talk to this trait so tests can script outcomes.
pub trait ProcessRunner {
    /// Run a command to completion.
    ///
    /// A non-zero exit is a successful `run`; it is up to the caller whether
    /// that is fatal. A missing executable is `Error::ToolNotFound`.
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutcome>;

    /// Whether `program` can be found on the search path
    fn is_installed(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    /// Run and fail on a non-zero exit
    fn checked(&self, spec: &CommandSpec) -> Result<ProcessOutcome> {
        self.run(spec)?.into_result()
    }
}

/// Runs real executables
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn spawn_error(spec: &CommandSpec, err: io::Error) -> Error {
        if let Some(dir) = &spec.cwd {
            if !dir.is_dir() {
                return Error::precondition(format!(
                    "working directory does not exist: {}",
                    dir.display()
                ));
            }
        }
        if err.kind() == io::ErrorKind::NotFound {
            Error::ToolNotFound {
                program: spec.program.clone(),
            }
        } else {
            Error::Io(err)
        }
    }
}

impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec.display(), mode = ?spec.mode))]
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutcome> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let stdin = if spec.stdin.is_some() {
            Stdio::piped()
        } else if spec.mode == Mode::Interactive {
            Stdio::inherit()
        } else {
            Stdio::null()
        };
        cmd.stdin(stdin);

        match spec.mode {
            Mode::Interactive => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            Mode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
            Mode::CaptureStdout => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
            }
        }

        let mut child = cmd.spawn().map_err(|e| Self::spawn_error(spec, e))?;

        // Feed stdin from a separate thread so a chatty child can't deadlock
        // against a full stdout pipe.
        let writer = match (&spec.stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                let input = input.clone();
                Some(std::thread::spawn(move || {
                    // The child may exit without reading everything (fzf on Esc).
                    if let Err(e) = pipe.write_all(input.as_bytes()) {
                        if e.kind() != io::ErrorKind::BrokenPipe {
                            warn!("failed to write stdin: {}", e);
                        }
                    }
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            let _ = handle.join();
        }

        let outcome = ProcessOutcome {
            command: spec.display(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!(code = ?outcome.code, "command finished");
        Ok(outcome)
    }
}
