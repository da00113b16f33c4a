use crate::error::{Error, Result};
use crate::instance::{InstanceId, InstanceProcess};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Owns the live table of running instances.
///
/// The table maps instance ids to child-process handles and is the
/// authoritative answer to "is the manager currently supervising a live
/// process for this id". It is in-memory only: after a manager restart it
/// starts empty and the orchestrator reconciles disk state against log
/// evidence instead.
pub struct ProcessSupervisor {
    /// Running instances keyed by id
    table: HashMap<InstanceId, InstanceProcess>,
    /// Wait between graceful termination and forced kill
    grace: Duration,
}

impl ProcessSupervisor {
    pub fn new(grace: Duration) -> Self {
        Self {
            table: HashMap::new(),
            grace,
        }
    }

    /// Whether `id` is currently tracked as running.
    pub fn is_tracked(&self, id: &InstanceId) -> bool {
        self.table.contains_key(id)
    }

    /// Spawn the executable for `id` and track the handle.
    ///
    /// Idempotent from the caller's perspective: when `id` is already
    /// tracked this is a no-op, leaving the existing process untouched.
    pub fn start(&mut self, id: &InstanceId, program: &Path, args: Vec<String>) -> Result<()> {
        if self.table.contains_key(id) {
            tracing::debug!(instance_id = %id, "Instance already running");
            return Ok(());
        }

        let mut process = InstanceProcess::new(id.clone(), program.to_path_buf(), args);
        process.spawn()?;
        self.table.insert(id.clone(), process);

        tracing::info!(instance_id = %id, "Started instance");
        Ok(())
    }

    /// Remove `id` from the table and terminate its process, gracefully
    /// first and by force after the grace period.
    pub async fn stop(&mut self, id: &InstanceId) -> Result<()> {
        let Some(mut process) = self.table.remove(id) else {
            tracing::warn!(instance_id = %id, "Stop requested for untracked instance");
            return Err(Error::InstanceNotFound(id.to_string()));
        };

        process.stop(self.grace).await?;
        tracing::info!(instance_id = %id, "Stopped instance");
        Ok(())
    }

    /// Drop a stale table entry without signalling the process.
    ///
    /// Used by reconciliation when log evidence shows the process already
    /// shut down on its own. Returns whether an entry was removed.
    pub fn forget(&mut self, id: &InstanceId) -> bool {
        match self.table.remove(id) {
            Some(mut process) => {
                process.reap();
                tracing::debug!(instance_id = %id, "Forgot stale table entry");
                true
            }
            None => false,
        }
    }

    /// Current key set of the process table, sorted.
    pub fn running_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.table.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Stop every tracked instance, collecting failures instead of
    /// aborting at the first one.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        let ids = self.running_ids();
        let mut errors = Vec::new();

        for id in ids {
            if let Err(e) = self.stop(&id).await {
                tracing::error!(instance_id = %id, error = %e, "Failed to stop instance");
                errors.push((id, e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0).1)
        } else {
            let error_msg = errors
                .iter()
                .map(|(id, e)| format!("{}: {}", id, e))
                .collect::<Vec<_>>()
                .join("; ");
            Err(Error::Other(format!(
                "Multiple instances failed to stop: {}",
                error_msg
            )))
        }
    }
}
