use crate::config::ManagerSettings;
use crate::instance::InstanceId;
use std::path::PathBuf;

/// Name of the per-instance config file inside each instance directory.
pub const CONFIG_FILE_NAME: &str = "server.sii";

/// Name of the per-instance log file written by the server executable.
pub const LOG_FILE_NAME: &str = "server.txt";

/// Deterministic on-disk layout for instance storage and logs.
///
/// Everything is anchored at the externally supplied data root:
///
/// ```text
/// <dataRoot>/<storageFolder>/<id>/server.sii             config
/// <dataRoot>/server.log.<storageFolder>/<id>/server.txt  log
/// ```
///
/// The log tree is created and written by the server executable itself;
/// the manager only reads it and appends markers.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    data_root: PathBuf,
    storage_folder: String,
}

impl StorageLayout {
    pub fn new(settings: &ManagerSettings) -> Self {
        Self {
            data_root: settings.data_root.clone(),
            storage_folder: settings.storage_folder.clone(),
        }
    }

    /// Root directory holding one subdirectory per instance.
    pub fn storage_root(&self) -> PathBuf {
        self.data_root.join(&self.storage_folder)
    }

    /// Storage directory for a single instance.
    pub fn instance_dir(&self, id: &InstanceId) -> PathBuf {
        self.storage_root().join(id.as_ref())
    }

    /// Full path of an instance's config file.
    pub fn config_path(&self, id: &InstanceId) -> PathBuf {
        self.instance_dir(id).join(CONFIG_FILE_NAME)
    }

    /// Directory the executable writes the instance's log into.
    pub fn log_dir(&self, id: &InstanceId) -> PathBuf {
        self.data_root
            .join(format!("server.log.{}", self.storage_folder))
            .join(id.as_ref())
    }

    /// Full path of an instance's log file.
    pub fn log_path(&self, id: &InstanceId) -> PathBuf {
        self.log_dir(id).join(LOG_FILE_NAME)
    }

    /// Config path relative to the data root, as passed to the executable
    /// via `-server_cfg`. Always forward-slash separated, matching what the
    /// server expects on every platform.
    pub fn config_arg(&self, id: &InstanceId) -> String {
        format!("{}/{}/{}", self.storage_folder, id, CONFIG_FILE_NAME)
    }
}
