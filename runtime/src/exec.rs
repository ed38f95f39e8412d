//! External command execution.
//!
//! Orchestrators never spawn processes directly; they hand an [`Invocation`]
//! to a [`CommandRunner`]. [`ProcessRunner`] is the real implementation.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use imgsync_core::error::{Result, SyncError};
use tokio::process::Command;

/// A program, its arguments and a time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
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
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of how the command ended.
    pub fn exit_indicator(&self) -> String {
        match self.code {
            Some(code) => format!("exit code: {}", code),
            None => "terminated by signal".to_string(),
        }
    }

    /// Convert a non-zero exit into an error.
    pub fn check(self, invocation: &Invocation) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(SyncError::CommandExit {
                command: invocation.program.clone(),
                status: self.exit_indicator(),
            })
        }
    }
}

/// Runs external commands with a timeout.
///
/// A timeout is reported as [`SyncError::TimeoutError`]; failure to start the
/// program as [`SyncError::CommandFailed`]. A non-zero exit is not an error at
/// this level.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Spawns real child processes via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", invocation);

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SyncError::CommandFailed {
                command: invocation.program.clone(),
                message: e.to_string(),
            })?;

        // Dropping the wait future on timeout kills the child.
        match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(e)) => Err(SyncError::CommandFailed {
                command: invocation.program.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(SyncError::TimeoutError {
                command: invocation.program.clone(),
                secs: invocation.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner for orchestrator tests.

    use std::sync::Mutex;

    use super::*;

    type Responder = Box<dyn Fn(&Invocation) -> Result<CommandOutput> + Send + Sync>;

    pub struct FakeRunner {
        calls: Mutex<Vec<Invocation>>,
        responder: Responder,
    }

    impl FakeRunner {
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&Invocation) -> Result<CommandOutput> + Send + Sync + 'static,
        {
            Self {
                calls: Mutex::new(Vec::new()),
                responder: Box::new(responder),
            }
        }

        /// Every command exits with `code`.
        pub fn exiting(code: i32) -> Self {
            Self::new(move |_| Ok(exit(code)))
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        /// Calls whose first argument is `subcommand` (e.g. "push").
        pub fn calls_to(&self, subcommand: &str) -> Vec<Invocation> {
            self.calls()
                .into_iter()
                .filter(|c| c.args.first().map(String::as_str) == Some(subcommand))
                .collect()
        }
    }

    pub fn exit(code: i32) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            ..Default::default()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            (self.responder)(invocation)
        }
    }
}
