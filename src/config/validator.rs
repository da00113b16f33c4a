use crate::config::ManagerSettings;
use crate::error::{Error, Result};

/// Validates manager settings beyond what the JSON schema enforces.
pub fn validate_settings(settings: &ManagerSettings) -> Result<()> {
    if settings.server_exe.as_os_str().is_empty() {
        return Err(Error::SettingsInvalid(
            "serverExe must not be empty".to_string(),
        ));
    }

    if settings.data_root.as_os_str().is_empty() {
        return Err(Error::SettingsInvalid(
            "dataRoot must not be empty".to_string(),
        ));
    }

    if settings.default_config.as_os_str().is_empty() {
        return Err(Error::SettingsInvalid(
            "defaultConfig must not be empty".to_string(),
        ));
    }

    // The storage folder is joined onto dataRoot and embedded in the
    // -server_cfg argument, so it must be a single path component.
    if settings.storage_folder.is_empty() {
        return Err(Error::SettingsInvalid(
            "storageFolder must not be empty".to_string(),
        ));
    }
    if settings.storage_folder.contains(['/', '\\']) {
        return Err(Error::SettingsInvalid(format!(
            "storageFolder '{}' must not contain path separators",
            settings.storage_folder
        )));
    }

    if settings.stop_grace_ms == 0 {
        return Err(Error::SettingsInvalid(
            "stopGraceMs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
