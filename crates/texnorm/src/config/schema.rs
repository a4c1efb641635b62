use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const SUPPORTED_VERSION: &str = "1.0";

pub fn default_batch_size() -> usize {
    10
}

fn default_tag() -> String {
    "renamed".to_string()
}

fn default_archive_marker() -> String {
    "Tex_Source.zip".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Config format version; only "1.0" is supported.
    pub version: String,

    /// Directory for ephemeral working trees and candidate archives.
    /// Falls back to the system temp directory when unset.
    #[serde(default)]
    pub temp_directory: Option<PathBuf>,

    /// Number of archives processed concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Tag added to a record after successful normalization.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Substring an attachment title must contain to be picked up.
    #[serde(default = "default_archive_marker")]
    pub archive_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION.to_string(),
            temp_directory: None,
            batch_size: default_batch_size(),
            tag: default_tag(),
            archive_marker: default_archive_marker(),
        }
    }
}
