use std::path::PathBuf;

use crate::config::Config;

pub struct PipelineConfig {
    /// Parent directory for working trees and candidate archives.
    pub temp_directory: PathBuf,
    /// Tag appended to the record after a successful replacement.
    pub tag: String,
    /// Substring an attachment title must contain to be picked up.
    pub archive_marker: String,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temp_directory: config
                .temp_directory
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            tag: config.tag.clone(),
            archive_marker: config.archive_marker.clone(),
        }
    }
}
