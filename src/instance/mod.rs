/// Instance management module for dedsrv-manager.
///
/// This module holds the pieces the orchestrator composes: instance
/// identity, the supervised child process, the in-memory process table,
/// and the liveness state machine that reconciles table membership with
/// log evidence.
///
/// # Components
///
/// * `id` - Short random instance identifiers
/// * `process` - One supervised server child process
/// * `supervisor` - The id → process table with start/stop/shutdown
/// * `liveness` - Derivation of running state at listing time
mod id;
mod liveness;
mod process;
mod supervisor;

pub use id::{ID_LENGTH, InstanceId};
pub use liveness::{
    LAUNCH_MARKER, Liveness, SHUTDOWN_ERROR_MARKER, SHUTDOWN_MARKER, assess,
};
pub use process::InstanceProcess;
pub use supervisor::ProcessSupervisor;

use serde::Serialize;

/// Unified per-instance view returned by the listing operation.
///
/// Everything besides `id` is derived on demand: `running` from the
/// liveness state machine, `display_name` from the instance's config,
/// `player_count` from its log tail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Instance id, doubling as the storage directory name.
    pub id: InstanceId,
    /// Whether the manager currently considers the instance running.
    pub running: bool,
    /// Lobby name parsed from the instance's config; empty when the
    /// config lacks the field.
    pub display_name: String,
    /// Most recently logged player count, `"0"` when none was logged.
    pub player_count: String,
}
