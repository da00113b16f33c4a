use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Character set instance ids are drawn from.
const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated instance ids.
pub const ID_LENGTH: usize = 8;

/// Unique identifier for a server instance.
///
/// The id doubles as the instance's storage directory name and its key in
/// the process table. Generation is pure and does not check for collisions;
/// the manager retries creation when provisioning reports that the
/// directory already exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a random id: 8 characters, lowercase letters and digits.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..ID_LENGTH)
            .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
            .collect();
        Self(id)
    }

    /// Wrap an existing directory name as an id.
    ///
    /// Used when rebuilding the instance list from storage; directory names
    /// are accepted as-is so that instances created by earlier versions
    /// remain visible.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        for _ in 0..100 {
            let id = InstanceId::generate();
            let s = id.as_ref();
            assert_eq!(s.len(), ID_LENGTH);
            assert!(
                s.bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            );
        }
    }
}
