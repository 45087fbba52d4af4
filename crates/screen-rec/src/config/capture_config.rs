use serde::{Deserialize, Serialize};

use std::path::PathBuf;

/// Where recordings go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Output directory; also holds the recordings metadata file.
    pub output_dir: PathBuf,
}
