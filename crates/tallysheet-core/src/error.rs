//! Error types for Tallysheet core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the Tallysheet document layer
#[derive(Error, Debug)]
pub enum TallysheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, TallysheetError>;
