//! Synchronous subprocess execution
//!
//! Every external call goes through a [`CommandRunner`] so the docker
//! orchestration can be exercised without a container runtime.

use std::fmt;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

/// A fully described external process: program plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the std command for this invocation
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, -1 when killed by a signal
    pub exit_code: i32,

    /// Captured stdout followed by stderr (empty when streamed)
    pub output: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, output: String, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code().unwrap_or(-1),
            output,
            duration,
        }
    }

    /// Turn a non-zero exit into an error naming the program
    pub fn check(self, program: &str) -> Result<Self> {
        if !self.success {
            bail!("{} exited with status {}", program, self.exit_code);
        }
        Ok(self)
    }
}

/// Run an invocation to completion.
///
/// With `inherit_io` the child writes straight to our stdout/stderr,
/// otherwise both streams are captured and concatenated.
pub fn run_command(invocation: &Invocation, inherit_io: bool) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = invocation.to_command();

    if inherit_io {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd
            .status()
            .with_context(|| format!("Failed to execute {}", invocation.program))?;

        Ok(CommandResult::from_status(status, String::new(), start.elapsed()))
    } else {
        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", invocation.program))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandResult::from_status(output.status, combined, start.elapsed()))
    }
}

/// Check if a command exists in PATH (or is a usable explicit path)
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Executes invocations on behalf of the docker client
pub trait CommandRunner {
    /// Run with output streamed to the console, failing on non-zero exit
    fn run(&self, invocation: &Invocation) -> Result<Duration>;

    /// Run with combined output captured, failing on non-zero exit
    fn capture(&self, invocation: &Invocation) -> Result<String>;

    /// Whether the program can be found at all
    fn is_available(&self, program: &str) -> bool {
        command_exists(program)
    }
}

/// Runs invocations as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Duration> {
        let result = run_command(invocation, true)?.check(&invocation.program)?;
        Ok(result.duration)
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        let result = run_command(invocation, false)?.check(&invocation.program)?;
        Ok(result.output)
    }
}
