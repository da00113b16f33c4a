/// Line the server executable writes when it shuts down cleanly.
pub const SHUTDOWN_MARKER: &str = "[sys] Process manager shutdown.";

/// Line the manager appends when it launches or adopts an instance.
pub const LAUNCH_MARKER: &str = "[sys] Process manager launch.";

/// Line the manager appends when reconciliation detects a shutdown it
/// did not observe.
pub const SHUTDOWN_ERROR_MARKER: &str = "[sys] Process manager shutdown error.";

/// Running state of an instance as derived at listing time.
///
/// `running` is never cached: every listing recomputes it from the two
/// facts available at that moment, process-table membership and the most
/// recent log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Tracked in the process table with no shutdown evidence.
    Running,
    /// Not tracked and no stale shutdown evidence.
    Stopped,
    /// Log evidence and the process table disagree: the log ends with the
    /// clean-shutdown marker while the table either still holds the id
    /// (the executable exited on its own) or lost it without the manager
    /// observing the shutdown. Must be reconciled back to `Stopped`
    /// before the instance can be reported or restarted.
    Unclean,
}

/// Derive liveness from table membership and the last log line.
pub fn assess(tracked: bool, last_log_line: Option<&str>) -> Liveness {
    let clean_shutdown = last_log_line.is_some_and(|line| line.trim_end() == SHUTDOWN_MARKER);

    match (tracked, clean_shutdown) {
        (true, false) => Liveness::Running,
        (false, false) => Liveness::Stopped,
        (_, true) => Liveness::Unclean,
    }
}
