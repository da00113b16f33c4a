//! Configuration module for dedsrv-manager.
//!
//! Two concerns live here: the manager's own settings (`ManagerSettings`,
//! a JSON document naming the external paths and behavioral knobs) and the
//! per-instance config storage (`ConfigStore`, filesystem CRUD over one
//! `server.sii` per instance, templated from the default config).
//!
//! # Examples
//!
//! Loading manager settings from a file:
//!
//! ```no_run
//! use dedsrv_manager::config::ManagerSettings;
//!
//! let settings = ManagerSettings::from_file("manager.json").unwrap();
//! println!("Data root: {}", settings.data_root.display());
//! ```
//!
//! Creating settings programmatically:
//!
//! ```
//! use dedsrv_manager::{InstanceManager, config::ManagerSettings};
//!
//! let settings = ManagerSettings::parse_from_str(r#"{
//!     "serverExe": "/opt/ats/bin/amtrucks_server",
//!     "dataRoot": "/home/ats/userdata",
//!     "defaultConfig": "/home/ats/server_config.sii"
//! }"#).unwrap();
//! let manager = InstanceManager::new(settings);
//! ```
mod layout;
mod settings;
mod store;
pub mod validator;

pub use layout::{CONFIG_FILE_NAME, LOG_FILE_NAME, StorageLayout};
pub use settings::ManagerSettings;
pub use store::{ConfigStore, normalize_config_text};
pub use validator::validate_settings;
