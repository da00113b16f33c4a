use crate::error::{Error, Result};
use crate::instance::InstanceId;
use async_process::{Child, Command};
use std::path::PathBuf;
use std::time::Duration;

/// A single supervised dedicated-server child process.
///
/// Wraps the spawned child together with the command it was launched
/// from. The working directory and environment are inherited from the
/// manager process; stdio is inherited too, since the server writes its
/// own log file rather than talking over pipes.
pub struct InstanceProcess {
    /// Instance this process belongs to
    id: InstanceId,
    /// Executable path
    program: PathBuf,
    /// Launch arguments
    args: Vec<String>,
    /// Child process handle
    child: Option<Child>,
}

impl InstanceProcess {
    /// Create a process description; nothing is spawned yet.
    pub fn new(id: InstanceId, program: PathBuf, args: Vec<String>) -> Self {
        Self {
            id,
            program,
            args,
            child: None,
        }
    }

    /// Spawn the child process.
    pub fn spawn(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Err(Error::Process(format!(
                "Instance '{}' already has a live child",
                self.id
            )));
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| {
                Error::Spawn(format!(
                    "Failed to launch {} for instance '{}': {}",
                    self.program.display(),
                    self.id,
                    e
                ))
            })?;

        tracing::debug!(
            instance_id = %self.id,
            pid = child.id(),
            "Spawned server process"
        );
        self.child = Some(child);
        Ok(())
    }

    /// Stop the child: request graceful termination, wait up to `grace`,
    /// then force-kill. A child that already exited counts as stopped.
    pub async fn stop(&mut self, grace: Duration) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Err(Error::Process(format!(
                "Instance '{}' has no live child to stop",
                self.id
            )));
        };

        // Already exited on its own.
        if let Ok(Some(status)) = child.try_status() {
            tracing::debug!(instance_id = %self.id, %status, "Child already exited");
            return Ok(());
        }

        request_termination(&child)?;

        let waited = tokio::time::timeout(grace, child.status()).await;
        match waited {
            Ok(Ok(status)) => {
                tracing::debug!(instance_id = %self.id, %status, "Child exited gracefully");
                Ok(())
            }
            Ok(Err(e)) => Err(Error::Process(format!(
                "Failed to collect exit status for '{}': {}",
                self.id, e
            ))),
            Err(_) => {
                tracing::warn!(
                    instance_id = %self.id,
                    grace_ms = grace.as_millis() as u64,
                    "Grace period elapsed, killing process"
                );
                child
                    .kill()
                    .map_err(|e| Error::Process(format!("Failed to kill '{}': {}", self.id, e)))?;
                let _ = child.status().await;
                Ok(())
            }
        }
    }

    /// Drop the handle without signalling, collecting the exit status if
    /// the child has already terminated. Used when reconciliation finds a
    /// stale table entry.
    pub fn reap(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_status() {
                Ok(Some(status)) => {
                    tracing::debug!(instance_id = %self.id, %status, "Reaped exited child")
                }
                Ok(None) => {
                    tracing::warn!(instance_id = %self.id, "Dropping handle to live child")
                }
                Err(e) => {
                    tracing::debug!(instance_id = %self.id, error = %e, "Could not reap child")
                }
            }
        }
    }
}

#[cfg(unix)]
fn request_termination(child: &Child) -> Result<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    match signal::kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM) {
        Ok(()) => Ok(()),
        // Exited between the liveness check and the signal.
        Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(e) => Err(Error::Process(format!("Failed to send SIGTERM: {}", e))),
    }
}

#[cfg(not(unix))]
fn request_termination(_child: &Child) -> Result<()> {
    // No graceful signal on this platform; the bounded wait in `stop`
    // still gives the child a chance to exit before the forced kill.
    Ok(())
}
