//! # File Storage
//!
//! Pluggable storage backends for file attachments, plus an scp-based
//! implementation that works against a local directory or a remote host
//! over ssh.
//!
//! ```ignore
//! use scpstore::file_storage::{ScpBackend, ScpConfig, StorageBackend};
//!
//! let backend = ScpBackend::new(ScpConfig::new("/var/www").with_prefix("uploads"))?;
//! backend.store(&mut std::io::Cursor::new(b"hello"), "a.txt")?;
//! assert_eq!(backend.url("a.txt"), "uploads/a.txt");
//! ```

pub mod errors;
pub mod backend;
pub mod config;
pub mod path;
pub mod staging;
pub mod transport;
pub mod scp;

pub use errors::{StorageError, StorageResult, TransferError};
pub use backend::StorageBackend;
pub use config::ScpConfig;
pub use path::PathResolver;
pub use staging::StagedFile;
pub use transport::{CommandTransport, CopyPath, TransportClient, TransportMode};
pub use scp::ScpBackend;
