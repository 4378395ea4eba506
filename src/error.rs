use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File {} already exists! Exiting without generating token.", .path.display())]
    TokenExists { path: PathBuf },

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Problems with the persisted token, raised at load time or when Google
/// rejects it with a 401.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Token file {} does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("Token at {} could not be read. Do you have permission to read the file? ({reason})", .path.display())]
    Unreadable { path: PathBuf, reason: std::io::Error },

    #[error("Token at {} is not valid: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Token was rejected, run generate_token again: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
