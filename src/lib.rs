/*!
 # dedsrv-manager

 A Rust library for managing multiple instances of the SCS dedicated
 game server executable (American Truck Simulator / Euro Truck Simulator 2).

 ## Overview

 dedsrv-manager provides functionality to:
 - Create isolated per-instance configuration directories from a template
 - Start, stop, and track the corresponding server child processes
 - Derive running status by reconciling the process table with log evidence
 - Inspect and edit per-instance configuration and logs

 ## Basic Usage

 ```no_run
 use dedsrv_manager::{InstanceManager, Result};

 #[tokio::main]
 async fn main() -> Result<()> {
     // Create a manager from a settings file
     let mut manager = InstanceManager::from_settings_file("manager.json")?;
     manager.init()?;

     // Create a new instance and start it
     let id = manager.create()?;
     manager.start(&id)?;

     // Inspect it
     for instance in manager.list_instances()? {
         println!("{} running={} players={}",
             instance.id, instance.running, instance.player_count);
     }

     // Stop everything before exiting
     manager.shutdown().await?;
     Ok(())
 }
 ```

 ## Features

 - **Instance Lifecycle**: Create, delete, start, and stop server instances
 - **Config Templating**: Copy-on-create, whitespace-normalized edits, reset-to-default
 - **Log Inspection**: Tail-limited retrieval, display-name and player-count extraction
 - **Reconciliation**: Running status recomputed on demand from table and log evidence
 - **Async Support**: Graceful-then-forced process termination with a bounded wait

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod config;
pub mod error;
pub mod instance;
pub mod logs;

pub use config::ManagerSettings;
pub use error::{Error, Result};
pub use instance::{Instance, InstanceId};

use config::{ConfigStore, StorageLayout, validate_settings};
use instance::{
    LAUNCH_MARKER, Liveness, ProcessSupervisor, SHUTDOWN_ERROR_MARKER, assess,
};
use logs::{LogReader, extract_display_name};
use std::path::Path;
use std::time::Duration;

/// Attempts at generating a fresh id before creation gives up. Collisions
/// in a 36^8 space are vanishingly rare, so hitting this limit means the
/// storage root is corrupt rather than unlucky.
const MAX_ID_ATTEMPTS: usize = 16;

/// Configure and supervise dedicated-server instances.
///
/// This struct is the main entry point: it owns the process table, the
/// config store, and the log reader, and exposes every instance-level
/// operation the presentation layer needs. Methods take `&mut self`; a
/// host that dispatches concurrent requests wraps the manager in its own
/// mutex. All public methods are instrumented with `tracing` spans.
pub struct InstanceManager {
    /// Manager settings
    settings: ManagerSettings,
    /// On-disk layout derived from the settings
    layout: StorageLayout,
    /// Per-instance config storage
    store: ConfigStore,
    /// Per-instance log access
    logs: LogReader,
    /// Live table of running instances
    supervisor: ProcessSupervisor,
    /// Guards against repeated `init`
    initialized: bool,
}

impl InstanceManager {
    /// Create a new manager from a settings file path.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(path), fields(settings_path = ?path.as_ref()))]
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self> {
        tracing::info!("Loading settings from file");
        let settings = ManagerSettings::from_file(path)?;
        validate_settings(&settings)?;
        Ok(Self::new(settings))
    }

    /// Create a new manager from a settings JSON string.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(settings))]
    pub fn from_settings_str(settings: &str) -> Result<Self> {
        tracing::info!("Loading settings from string");
        let settings = ManagerSettings::parse_from_str(settings)?;
        validate_settings(&settings)?;
        Ok(Self::new(settings))
    }

    /// Create a new manager from already-validated settings.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(settings), fields(data_root = %settings.data_root.display()))]
    pub fn new(settings: ManagerSettings) -> Self {
        tracing::info!("Creating new InstanceManager");
        let layout = StorageLayout::new(&settings);
        let store = ConfigStore::new(layout.clone(), settings.default_config.clone());
        let logs = LogReader::new(layout.clone());
        let supervisor = ProcessSupervisor::new(Duration::from_millis(settings.stop_grace_ms));

        Self {
            settings,
            layout,
            store,
            logs,
            supervisor,
            initialized: false,
        }
    }

    /// One-time initialization.
    ///
    /// Ensures the instance-storage root exists, appends a launch marker
    /// to the log of every instance already on disk (best-effort), and
    /// starts those instances when `autoStartExisting` is set. A second
    /// call is a no-op with a warning.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            tracing::warn!(error = %Error::AlreadyInitialized, "init called twice, ignoring");
            return Ok(());
        }

        let root = self.layout.storage_root();
        if root.exists() {
            tracing::debug!(root = %root.display(), "Storage root already exists");
        } else {
            std::fs::create_dir_all(&root).map_err(|e| {
                Error::Io(format!(
                    "Failed to create storage root {}: {}",
                    root.display(),
                    e
                ))
            })?;
            tracing::info!(root = %root.display(), "Created storage root");
        }

        self.initialized = true;

        let existing = self.store.list_ids()?;
        tracing::info!(num_instances = existing.len(), "Adopting existing instances");

        for id in existing {
            self.mark(&id, LAUNCH_MARKER);

            if self.settings.auto_start_existing {
                if let Err(e) = self.start(&id) {
                    // One broken instance must not abort manager startup.
                    tracing::error!(instance_id = %id, error = %e, "Failed to auto-start instance");
                }
            }
        }

        tracing::info!("Manager initialized");
        Ok(())
    }

    /// List every instance on disk with its derived state.
    ///
    /// `running` is recomputed on every call: an id is running iff it is
    /// tracked in the process table and its log does not end with the
    /// clean-shutdown marker. When the log and the table disagree, the
    /// instance is reconciled as stopped and the shutdown-error marker is
    /// appended to its log exactly once.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub fn list_instances(&mut self) -> Result<Vec<Instance>> {
        let ids = self.store.list_ids()?;
        let mut instances = Vec::with_capacity(ids.len());

        for id in ids {
            let tracked = self.supervisor.is_tracked(&id);
            let last_line = self.logs.last_line(&id)?;

            let running = match assess(tracked, last_line.as_deref()) {
                Liveness::Running => true,
                Liveness::Stopped => false,
                Liveness::Unclean => {
                    self.reconcile_unclean(&id);
                    false
                }
            };

            let display_name = match self.store.read(&id).and_then(|t| extract_display_name(&t)) {
                Ok(name) => name,
                Err(Error::MalformedConfig(_)) | Err(Error::InstanceNotFound(_)) => {
                    tracing::warn!(instance_id = %id, "Config has no usable lobby name");
                    String::new()
                }
                Err(e) => return Err(e),
            };

            let player_count = self.logs.extract_player_count(&id)?;

            instances.push(Instance {
                id,
                running,
                display_name,
                player_count,
            });
        }

        tracing::debug!(num_instances = instances.len(), "Listed instances");
        Ok(instances)
    }

    /// Create a new instance: generate an id, provision its storage
    /// directory, and copy the default config template into it.
    ///
    /// Id generation is retried when the directory already exists, so a
    /// collision can never overwrite another instance's storage.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub fn create(&mut self) -> Result<InstanceId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = InstanceId::generate();

            match self.store.provision(&id) {
                Ok(()) => {
                    tracing::info!(instance_id = %id, "Created instance");
                    return Ok(id);
                }
                // Provisioning lost against an existing directory. A failed
                // provision cleans up after itself, so the directory still
                // existing means the id belongs to another instance.
                Err(_) if self.layout.instance_dir(&id).exists() => {
                    tracing::warn!(instance_id = %id, "Generated id collides, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Other(format!(
            "Could not allocate a unique instance id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// Delete an instance's entire storage directory.
    ///
    /// The caller must stop the instance first; deleting a running
    /// instance leaves its process unsupervised.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn delete(&mut self, id: &InstanceId) -> Result<()> {
        if self.supervisor.is_tracked(id) {
            tracing::warn!("Deleting an instance that is still tracked as running");
        }

        self.store.remove(id)?;
        tracing::info!("Deleted instance");
        Ok(())
    }

    /// Get the full content of an instance's config file.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn get_config(&self, id: &InstanceId) -> Result<String> {
        self.store.read(id)
    }

    /// Overwrite an instance's config file with `text`, normalized to
    /// single newline-joined, trimmed, non-blank lines.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self, text), fields(instance_id = %id))]
    pub fn edit_config(&mut self, id: &InstanceId, text: &str) -> Result<()> {
        self.store.write(id, text)
    }

    /// Reset an instance's config file to the default template.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn reset_config(&mut self, id: &InstanceId) -> Result<()> {
        self.store.reset_to_default(id)
    }

    /// Start an instance's server process.
    ///
    /// Idempotent from the caller's perspective: starting an instance that
    /// is already tracked leaves exactly one process and does not error.
    /// Appends the launch marker first so that stale shutdown evidence in
    /// the log cannot mask the new launch.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn start(&mut self, id: &InstanceId) -> Result<()> {
        if !self.layout.config_path(id).exists() {
            tracing::warn!("Start requested for unknown instance");
            return Err(Error::InstanceNotFound(id.to_string()));
        }

        if self.supervisor.is_tracked(id) {
            tracing::debug!("Instance already running");
            return Ok(());
        }

        self.mark(id, LAUNCH_MARKER);

        let args = vec![
            "-nosingle".to_string(),
            "-server_cfg".to_string(),
            self.layout.config_arg(id),
        ];
        self.supervisor.start(id, &self.settings.server_exe, args)
    }

    /// Stop an instance's server process, gracefully first and by force
    /// after the configured grace period.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub async fn stop(&mut self, id: &InstanceId) -> Result<()> {
        self.supervisor.stop(id).await
    }

    /// Get the last `limit` lines of an instance's log in file order;
    /// `limit == 0` returns the whole file. An instance that has never
    /// been launched yields an empty list.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn get_logs(&self, id: &InstanceId, limit: usize) -> Result<Vec<String>> {
        self.logs.tail(id, limit)
    }

    /// Get the most recently logged player count for an instance, `"0"`
    /// when nothing was logged yet.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn get_player_count(&self, id: &InstanceId) -> Result<String> {
        self.logs.extract_player_count(id)
    }

    /// Get the display name parsed from an instance's config, or an empty
    /// string when the config lacks the `lobby_name:` field.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(instance_id = %id))]
    pub fn get_display_name(&self, id: &InstanceId) -> Result<String> {
        let config = self.store.read(id)?;

        match extract_display_name(&config) {
            Ok(name) => Ok(name),
            Err(Error::MalformedConfig(_)) => {
                tracing::warn!("Config has no lobby_name field");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Get the ids currently tracked as running, sorted.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub fn list_running_ids(&self) -> Vec<InstanceId> {
        self.supervisor.running_ids()
    }

    /// Stop every running instance. Registered by the host to run once at
    /// process exit; calling it with nothing running is a no-op.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down all instances");
        self.supervisor.shutdown_all().await
    }

    /// Reconcile an instance whose log evidence and table entry disagree:
    /// drop any stale handle and record the unobserved shutdown in the
    /// log. The appended marker replaces the clean-shutdown line as the
    /// most recent one, so the transition fires exactly once.
    fn reconcile_unclean(&mut self, id: &InstanceId) {
        let had_entry = self.supervisor.forget(id);
        tracing::warn!(
            instance_id = %id,
            was_tracked = had_entry,
            "Instance shut down without the manager observing it"
        );
        self.mark(id, SHUTDOWN_ERROR_MARKER);
    }

    /// Best-effort marker append; supervision must not fail because the
    /// log tree is missing or unwritable.
    fn mark(&self, id: &InstanceId, marker: &str) {
        if let Err(e) = self.logs.append_marker(id, marker) {
            tracing::warn!(instance_id = %id, error = %e, "Failed to append log marker");
        }
    }
}
