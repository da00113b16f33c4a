use crate::config::StorageLayout;
use crate::error::{Error, Result};
use crate::instance::InstanceId;
use std::fs;
use std::path::PathBuf;

/// Filesystem-backed store for per-instance `server.sii` files.
///
/// One directory per instance under the storage root, each holding a
/// single config file that starts life as a copy of the default template.
/// All operations are full-file reads and writes; there is no merging.
pub struct ConfigStore {
    layout: StorageLayout,
    template: PathBuf,
}

impl ConfigStore {
    pub fn new(layout: StorageLayout, template: PathBuf) -> Self {
        Self { layout, template }
    }

    /// Create the storage directory for a new instance and copy the
    /// default template into its config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory already exists (the caller
    /// treats this as an id collision and retries with a fresh id) or if
    /// the template cannot be read.
    pub fn provision(&self, id: &InstanceId) -> Result<()> {
        let dir = self.layout.instance_dir(id);

        fs::create_dir(&dir).map_err(|e| {
            Error::Io(format!(
                "Failed to create instance directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        tracing::debug!(instance_id = %id, dir = %dir.display(), "Created instance directory");

        if let Err(e) = self.copy_template(id) {
            // Never leave a half-provisioned directory behind: after a
            // failed provision, the directory exists only when it belonged
            // to somebody else already.
            let _ = fs::remove_dir_all(&dir);
            return Err(e);
        }

        Ok(())
    }

    /// Return the full content of the instance's config file.
    pub fn read(&self, id: &InstanceId) -> Result<String> {
        let path = self.layout.config_path(id);

        if !path.exists() {
            return Err(Error::InstanceNotFound(id.to_string()));
        }

        fs::read_to_string(&path)
            .map_err(|e| Error::Io(format!("Failed to read config for '{}': {}", id, e)))
    }

    /// Overwrite the instance's config file with `text`, normalized first.
    ///
    /// Fully replaces prior content. See [`normalize_config_text`] for the
    /// normalization applied.
    pub fn write(&self, id: &InstanceId, text: &str) -> Result<()> {
        let path = self.layout.config_path(id);

        if !path.exists() {
            return Err(Error::InstanceNotFound(id.to_string()));
        }

        let normalized = normalize_config_text(text);
        fs::write(&path, normalized)
            .map_err(|e| Error::Io(format!("Failed to write config for '{}': {}", id, e)))?;

        tracing::debug!(instance_id = %id, "Wrote instance config");
        Ok(())
    }

    /// Re-copy the default template over the instance's config file,
    /// discarding any edits.
    pub fn reset_to_default(&self, id: &InstanceId) -> Result<()> {
        if !self.layout.instance_dir(id).exists() {
            return Err(Error::InstanceNotFound(id.to_string()));
        }

        self.copy_template(id)?;
        tracing::debug!(instance_id = %id, "Reset instance config to template");
        Ok(())
    }

    /// Recursively delete the instance's entire storage directory.
    ///
    /// Not running-aware: the caller must stop the instance first.
    pub fn remove(&self, id: &InstanceId) -> Result<()> {
        let dir = self.layout.instance_dir(id);

        if !dir.exists() {
            return Err(Error::InstanceNotFound(id.to_string()));
        }

        fs::remove_dir_all(&dir)
            .map_err(|e| Error::Io(format!("Failed to remove instance '{}': {}", id, e)))?;

        tracing::debug!(instance_id = %id, "Removed instance storage");
        Ok(())
    }

    /// List the ids of every instance directory under the storage root,
    /// sorted by name. An absent storage root yields an empty list.
    pub fn list_ids(&self) -> Result<Vec<InstanceId>> {
        let root = self.layout.storage_root();

        if !root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&root).map_err(|e| {
            Error::Io(format!(
                "Failed to list storage root {}: {}",
                root.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::Io(format!("Failed to read storage entry: {}", e)))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| Error::Io(format!("Failed to stat storage entry: {}", e)))?
                .is_dir();
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                ids.push(InstanceId::from_name(name));
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn copy_template(&self, id: &InstanceId) -> Result<()> {
        let content = fs::read_to_string(&self.template).map_err(|e| {
            Error::Io(format!(
                "Failed to read template {}: {}",
                self.template.display(),
                e
            ))
        })?;

        let path = self.layout.config_path(id);
        fs::write(&path, content)
            .map_err(|e| Error::Io(format!("Failed to write config for '{}': {}", id, e)))
    }
}

/// Normalize config text submitted through an external editor.
///
/// Splits the text into lines, trims each line and drops the blank ones,
/// then rejoins with single `\n` separators. This strips the carriage
/// returns, indentation and blank-line inflation that browser textareas
/// tend to inject, and is idempotent: normalizing twice yields the same
/// text as normalizing once.
pub fn normalize_config_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
