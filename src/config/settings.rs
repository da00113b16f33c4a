use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_stop_grace_ms() -> u64 {
    500
}

fn default_storage_folder() -> String {
    "atsms".to_string()
}

/// Settings for the instance manager.
///
/// This structure names the three external paths the manager is anchored
/// to (server executable, game data root, default config template) plus a
/// few behavioral knobs. It is the only configuration the library itself
/// consumes; per-instance `server.sii` files are data, not settings.
///
/// # JSON Schema
///
/// The settings follow this JSON schema:
///
/// ```json
/// {
///   "serverExe": "/opt/ats/bin/amtrucks_server",
///   "dataRoot": "/home/ats/.local/share/American Truck Simulator",
///   "defaultConfig": "/home/ats/server_config.sii",
///   "autoStartExisting": false,
///   "stopGraceMs": 500,
///   "storageFolder": "atsms"
/// }
/// ```
///
/// # Examples
///
/// Loading settings from a file:
///
/// ```no_run
/// use dedsrv_manager::config::ManagerSettings;
///
/// let settings = ManagerSettings::from_file("manager.json").unwrap();
/// println!("Server executable: {}", settings.server_exe.display());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSettings {
    /// Path to the dedicated-server executable.
    pub server_exe: PathBuf,

    /// Path to the game user-data directory. Instance storage and the
    /// per-instance log tree both live under this root.
    pub data_root: PathBuf,

    /// Path to the default `server.sii` template copied into every new
    /// instance.
    pub default_config: PathBuf,

    /// Start every instance found on disk during `init`.
    #[serde(default)]
    pub auto_start_existing: bool,

    /// Milliseconds to wait between the graceful termination request and
    /// the forced kill when stopping an instance.
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,

    /// Name of the instance-storage folder under the data root. The same
    /// name keys the log tree (`server.log.<storageFolder>`).
    #[serde(default = "default_storage_folder")]
    pub storage_folder: String,
}

impl ManagerSettings {
    /// Loads settings from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::SettingsParse(format!("Failed to read settings file: {}", e)))?;

        Self::parse_from_str(&content)
    }

    /// Parses settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The string is not valid JSON
    /// * The JSON does not conform to the expected schema
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::SettingsParse(format!("Failed to parse JSON settings: {}", e)))
    }
}
