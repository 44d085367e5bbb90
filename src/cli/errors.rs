//! CLI-specific error types

use std::fmt;
use std::io;

use crate::file_storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or binary resolution error
    ConfigError,
    /// I/O error (stdin/stdout or local files)
    IoError,
    /// Copy command failed
    TransferFailed,
    /// Nothing stored under the identifier
    NotFound,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "STORE_CLI_CONFIG_ERROR",
            Self::IoError => "STORE_CLI_IO_ERROR",
            Self::TransferFailed => "STORE_CLI_TRANSFER_FAILED",
            Self::NotFound => "STORE_CLI_NOT_FOUND",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        let code = match &e {
            StorageError::Configuration(_) => CliErrorCode::ConfigError,
            StorageError::Transfer(_) => CliErrorCode::TransferFailed,
            StorageError::FileNotFound(_) => CliErrorCode::NotFound,
            StorageError::IoError(_) => CliErrorCode::IoError,
        };
        Self::new(code, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
