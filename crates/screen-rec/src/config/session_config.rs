use crate::config::{default_delete_grace_ms, default_finalize_grace_ms, default_title_max_len};

use serde::{Deserialize, Serialize};

/// Session timing and title settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Wait before locating the output of a stopped recording.
    #[serde(default = "default_finalize_grace_ms")]
    pub finalize_grace_ms: u64,
    /// Wait before deleting a cancelled recording.
    #[serde(default = "default_delete_grace_ms")]
    pub delete_grace_ms: u64,
    /// Maximum generated title length in characters.
    #[serde(default = "default_title_max_len")]
    pub title_max_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            finalize_grace_ms: default_finalize_grace_ms(),
            delete_grace_ms: default_delete_grace_ms(),
            title_max_len: default_title_max_len(),
        }
    }
}
