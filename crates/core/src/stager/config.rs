//! Configuration for the stager module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system stager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagerConfig {
    /// Buffer size for cross-filesystem copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Whether to replace files that already exist at the destination.
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Whether to compare SHA-256 checksums after a cross-filesystem copy.
    #[serde(default = "default_true")]
    pub verify_copies: bool,
}

fn default_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

fn default_true() -> bool {
    true
}

impl Default for StagerConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            overwrite: true,
            verify_copies: true,
        }
    }
}

impl StagerConfig {
    /// Sets whether existing destinations get replaced.
    pub fn with_overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Sets whether copies are checksum verified.
    pub fn with_copy_verification(mut self, enabled: bool) -> Self {
        self.verify_copies = enabled;
        self
    }

    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}
