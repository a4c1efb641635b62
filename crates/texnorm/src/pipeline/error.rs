use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ExtractError, PackageError, RenameError, TransactionError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input archive: {0}")]
    InvalidInput(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("No .tex files found in archive")]
    NoTexFiles,

    #[error("Renaming failed: {0}")]
    Rename(#[from] RenameError),

    #[error("Packaging failed: {0}")]
    Packaging(#[from] PackageError),

    #[error("Replacement transaction failed: {0}")]
    Transaction(#[from] TransactionError),
}

#[derive(Debug, Clone)]
pub enum PipelineWarning {
    CleanupFailed { path: PathBuf, error: String },
    TagFailed { record: String, error: String },
}
