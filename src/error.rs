/// Error handling module for dedsrv-manager.
///
/// This module defines the error types used throughout the library.
/// Storage and process errors propagate unchanged to the orchestrator;
/// the presentation layer sitting on top of the manager is expected to
/// translate them into user-facing responses.
///
/// # Example
///
/// ```
/// use dedsrv_manager::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::InstanceNotFound(id)) => println!("Instance '{}' does not exist", id),
///         Err(Error::Spawn(msg)) => println!("Server executable failed to launch: {}", msg),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use thiserror::Error;

/// Errors that can occur in the dedsrv-manager library.
///
/// Each variant carries enough context to diagnose the failure without
/// access to the manager's internal state.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse manager settings from a file or string.
    ///
    /// This error occurs when:
    /// - The settings JSON is malformed
    /// - Required fields are missing
    /// - Field types are incorrect
    #[error("Failed to parse settings: {0}")]
    SettingsParse(String),

    /// Settings are valid JSON but contain invalid values.
    ///
    /// This error occurs when:
    /// - A required path is empty
    /// - The storage folder name contains path separators
    /// - The stop grace period is zero
    #[error("Invalid settings: {0}")]
    SettingsInvalid(String),

    /// Operation referenced an instance id with no backing storage or
    /// process-table entry.
    ///
    /// This error occurs when:
    /// - Reading or writing the config of an unknown instance
    /// - Stopping an instance that is not currently tracked as running
    /// - Deleting an instance whose storage directory does not exist
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// The manager was initialized a second time.
    ///
    /// Non-fatal: `init` logs this and returns `Ok`, so the variant only
    /// surfaces in log output.
    #[error("Manager already initialized")]
    AlreadyInitialized,

    /// An underlying filesystem operation failed.
    ///
    /// This error occurs when:
    /// - The default config template cannot be read
    /// - An instance directory cannot be created or removed
    /// - Permissions or disk space prevent a write
    #[error("I/O error: {0}")]
    Io(String),

    /// Config text lacks an expected field during extraction.
    ///
    /// Recovered locally by the manager (an empty display name is
    /// substituted); never propagated out of the public API.
    #[error("Malformed config: {0}")]
    MalformedConfig(String),

    /// The external server executable could not be launched.
    ///
    /// This error occurs when:
    /// - The executable path does not exist
    /// - The binary is not executable on this platform
    #[error("Failed to spawn server process: {0}")]
    Spawn(String),

    /// Error while signalling or waiting on a supervised child process.
    ///
    /// This error occurs when:
    /// - A termination signal cannot be delivered
    /// - Collecting the exit status fails
    #[error("Server process error: {0}")]
    Process(String),

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for dedsrv-manager operations.
///
/// Convenience alias for `std::result::Result` with this module's `Error`.
pub type Result<T> = std::result::Result<T, Error>;
