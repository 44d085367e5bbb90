//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Transfer errors
    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    // Object errors
    #[error("File not found: {0}")]
    FileNotFound(String),

    // Local I/O errors
    #[error("I/O error: {0}")]
    IoError(String),
}

impl StorageError {
    /// Whether the error points at the environment rather than one operation.
    ///
    /// Fatal errors are not expected to clear up by calling again.
    pub fn is_fatal(&self) -> bool {
        match self {
            StorageError::Configuration(_) => true,
            StorageError::IoError(_) => true,
            StorageError::Transfer(_) => false,
            StorageError::FileNotFound(_) => false,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e.to_string())
    }
}

/// Failure of an external copy or shell command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("failed to launch {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not stage stream: {reason}")]
    Stream { reason: String },
}

impl TransferError {
    /// Exit code of the failed command, if it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TransferError::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(StorageError::Configuration("scp".into()).is_fatal());
        assert!(StorageError::IoError("chmod".into()).is_fatal());
        assert!(!StorageError::FileNotFound("a.txt".into()).is_fatal());

        let transfer = TransferError::Stream { reason: "eof".into() };
        assert!(!StorageError::from(transfer).is_fatal());
    }

    #[test]
    fn test_non_zero_exit_message() {
        let err = TransferError::NonZeroExit {
            program: "scp".into(),
            code: Some(1),
            stderr: "No such file or directory".into(),
        };
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(
            err.to_string(),
            "scp exited with status 1: No such file or directory"
        );

        let killed = TransferError::NonZeroExit {
            program: "ssh".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("no status"));
    }
}
