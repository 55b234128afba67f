//! Compiler session lifecycle management.
//!
//! A [`SessionManager`] owns at most one running compiler process at a
//! time and tracks it through an explicit state machine:
//! `Stopped → Starting → Running → Stopping → Stopped`. No transition
//! skips a state, `start` is rejected outside `Stopped`, and `stop` is
//! idempotent from every state.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{info, warn};

use crate::launch::LaunchConfig;
use crate::{AppError, Result};

/// Time allowed for the compiler to exit on its own before a force-kill.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Lifecycle state of the managed session.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session exists.
    #[default]
    Stopped,
    /// `start` accepted, process spawn in progress.
    Starting,
    /// Compiler process is live and owns the transport.
    Running,
    /// Graceful shutdown in progress.
    Stopping,
}

/// Stdio transport of a running compiler session, handed to the caller.
///
/// The manager keeps the child process itself; the caller drives the wire
/// protocol through these pipes. Dropping the handle closes the child's
/// stdin, which is the signal for a well-behaved server to exit.
#[derive(Debug)]
pub struct SessionHandle {
    /// Child's stdin for sending protocol messages.
    pub stdin: ChildStdin,
    /// Buffered reader over the child's stdout.
    pub stdout: BufReader<ChildStdout>,
}

/// One managed compiler process and the configuration it was spawned with.
#[derive(Debug)]
struct Session {
    config: LaunchConfig,
    child: Child,
}

/// Owner of the singleton compiler session for one host context.
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
    current: Option<Session>,
}

impl SessionManager {
    /// Manager with no session, in the `Stopped` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Spawn the compiler described by `config` and take ownership of it.
    ///
    /// The child is spawned with piped stdin/stdout (the transport),
    /// inherited stderr, `kill_on_drop` so an abandoned manager cannot leak
    /// the process, and the environment augmented with the config's
    /// variables.
    ///
    /// # Errors
    ///
    /// - `AppError::AlreadyRunning` if the state is not `Stopped`; the
    ///   running session is unaffected.
    /// - `AppError::Spawn` if the OS spawn fails or a pipe cannot be
    ///   captured; the state returns to `Stopped`.
    pub fn start(&mut self, config: LaunchConfig) -> Result<SessionHandle> {
        if self.state != SessionState::Stopped {
            return Err(AppError::AlreadyRunning(format!(
                "cannot start while session is {:?}",
                self.state
            )));
        }
        self.state = SessionState::Starting;

        let mut cmd = Command::new(&config.executable);
        cmd.args(&config.args);
        for (key, value) in &config.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                self.state = SessionState::Stopped;
                return Err(AppError::Spawn(format!(
                    "failed to spawn {}: {err}",
                    config.executable.display()
                )));
            }
        };

        let Some(stdin) = child.stdin.take() else {
            return self.abort_start(child, "failed to capture compiler stdin");
        };
        let Some(stdout) = child.stdout.take() else {
            return self.abort_start(child, "failed to capture compiler stdout");
        };

        info!(path = %config.executable.display(), "compiler session running");
        self.current = Some(Session { config, child });
        self.state = SessionState::Running;

        Ok(SessionHandle {
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Stop the session and release the compiler process.
    ///
    /// No-op when already `Stopped` — nothing is spawned or killed. On
    /// every other path the state ends at `Stopped` and the process is
    /// released, even when graceful shutdown reports an error; such errors
    /// are logged, never propagated.
    pub async fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopping;

        if let Some(session) = self.current.take() {
            if let Err(err) = shutdown_child(session.child).await {
                warn!(%err, "graceful shutdown failed, resources released regardless");
            }
        }

        self.state = SessionState::Stopped;
        info!("compiler session stopped");
    }

    /// Human-readable description of the configured executable path.
    ///
    /// Read-only and safe to call in any state.
    #[must_use]
    pub fn diagnostic_description(&self) -> String {
        self.current.as_ref().map_or_else(
            || "compiler path: none configured".to_owned(),
            |session| format!("compiler path: {}", session.config.executable.display()),
        )
    }

    fn abort_start(&mut self, mut child: Child, msg: &str) -> Result<SessionHandle> {
        child.start_kill().ok();
        self.state = SessionState::Stopped;
        Err(AppError::Spawn(msg.to_owned()))
    }
}

/// Wait up to [`SHUTDOWN_GRACE`] for a natural exit, then force-kill.
async fn shutdown_child(mut child: Child) -> Result<()> {
    match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
        Ok(Ok(exit)) => {
            info!(?exit, "compiler exited gracefully");
            Ok(())
        }
        Ok(Err(err)) => Err(AppError::Shutdown(format!(
            "error waiting for compiler: {err}"
        ))),
        Err(_) => {
            warn!("compiler did not exit within grace period, forcing kill");
            child
                .kill()
                .await
                .map_err(|err| AppError::Shutdown(format!("failed to force-kill compiler: {err}")))
        }
    }
}
