//! Log inspection for dedsrv-manager.
//!
//! Each instance has one append-only log file written by the server
//! executable. The manager never rewrites it; it tails the file for
//! display, extracts a couple of fields by pattern matching, and appends
//! single-line markers (launch, shutdown error) as supervision evidence.

use crate::config::StorageLayout;
use crate::error::{Error, Result};
use crate::instance::InstanceId;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// How many trailing log lines the player-count scan inspects.
const PLAYER_COUNT_WINDOW: usize = 25;

/// Config field holding the server's display name.
const LOBBY_NAME_FIELD: &str = "lobby_name:";

/// Log line fragment the executable emits with the current player count.
const PLAYERS_FIELD: &str = "Players:";

/// Reads per-instance log files and extracts derived fields.
pub struct LogReader {
    layout: StorageLayout,
}

impl LogReader {
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    /// Return the last `limit` lines of the instance's log in file order;
    /// `limit == 0` returns the entire file.
    ///
    /// A missing log file yields an empty vec, not an error: a new
    /// instance has no log until its first launch.
    pub fn tail(&self, id: &InstanceId, limit: usize) -> Result<Vec<String>> {
        let path = self.layout.log_path(id);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Io(format!("Failed to read log for '{}': {}", id, e)))?;

        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        if limit == 0 || limit >= lines.len() {
            return Ok(lines);
        }

        Ok(lines[lines.len() - limit..].to_vec())
    }

    /// The single most recent log line, if any.
    pub fn last_line(&self, id: &InstanceId) -> Result<Option<String>> {
        Ok(self.tail(id, 1)?.pop())
    }

    /// Most recently logged player count for the instance.
    ///
    /// Scans the last 25 log lines newest-first for a `Players:` line and
    /// returns its final character; `"0"` when no such line exists. The
    /// single-character read matches the original tool and is only
    /// correct for single-digit counts.
    pub fn extract_player_count(&self, id: &InstanceId) -> Result<String> {
        let window = self.tail(id, PLAYER_COUNT_WINDOW)?;

        for line in window.iter().rev() {
            if line.contains(PLAYERS_FIELD) {
                if let Some(count) = line.trim_end().chars().last() {
                    return Ok(count.to_string());
                }
            }
        }

        Ok("0".to_string())
    }

    /// Append a single marker line to the instance's log, creating the
    /// file if needed.
    ///
    /// The log directory tree belongs to the server executable; when it
    /// does not exist yet this is a silent no-op rather than an error.
    pub fn append_marker(&self, id: &InstanceId, marker: &str) -> Result<()> {
        let dir = self.layout.log_dir(id);
        if !dir.exists() {
            tracing::debug!(instance_id = %id, "Log directory missing, skipping marker");
            return Ok(());
        }

        let path = self.layout.log_path(id);
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| Error::Io(format!("Failed to open log for '{}': {}", id, e)))?;

        writeln!(file, "{}", marker)
            .map_err(|e| Error::Io(format!("Failed to append marker for '{}': {}", id, e)))?;

        tracing::trace!(instance_id = %id, marker, "Appended log marker");
        Ok(())
    }
}

/// Extract the server display name from config text.
///
/// Takes the remainder of the line following `lobby_name:`, stripped of
/// surrounding whitespace and quote characters.
///
/// # Errors
///
/// Returns `Error::MalformedConfig` when the field is absent. Callers
/// treat this as a recoverable condition, not a fatal one.
pub fn extract_display_name(config_text: &str) -> Result<String> {
    let start = config_text
        .find(LOBBY_NAME_FIELD)
        .ok_or_else(|| Error::MalformedConfig(format!("missing {} field", LOBBY_NAME_FIELD)))?;

    let rest = &config_text[start + LOBBY_NAME_FIELD.len()..];
    let value = rest.lines().next().unwrap_or("");

    Ok(value.trim().trim_matches('"').trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_display_name() {
        let config = "SiiNunit\n{\n lobby_name: \"Night Convoy\"\n max_players: 8\n}\n";
        assert_eq!(extract_display_name(config).unwrap(), "Night Convoy");
    }

    #[test]
    fn test_extract_display_name_unquoted() {
        let config = "lobby_name: plain name\nother: 1";
        assert_eq!(extract_display_name(config).unwrap(), "plain name");
    }

    #[test]
    fn test_extract_display_name_missing_field() {
        let result = extract_display_name("SiiNunit\n{\n}\n");
        assert!(matches!(result, Err(Error::MalformedConfig(_))));
    }
}
