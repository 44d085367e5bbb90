//! # Storage Backend Trait

use std::io::Read;

use super::errors::{StorageError, StorageResult};
use super::staging::StagedFile;

/// Contract every storage backend exposes, whatever the transport.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Persist the stream under `id`, handing back the staged copy.
    fn store(&self, io: &mut dyn Read, id: &str) -> StorageResult<StagedFile>;

    /// Fetch `id` into a local temp file.
    ///
    /// `Ok(None)` covers both "not found" and "transfer failed".
    fn retrieve(&self, id: &str) -> StorageResult<Option<StagedFile>>;

    /// Check whether `id` is present. False on any failure.
    fn exists(&self, id: &str) -> bool;

    /// Remove `id`. Failures are not reported.
    fn delete(&self, id: &str);

    /// Remove everything under this backend's prefix. Failures are not reported.
    fn delete_all(&self);

    /// Public URL for `id`
    fn url(&self, id: &str) -> String;

    /// Retrieve `id` for streaming, failing if nothing came back.
    fn open(&self, id: &str) -> StorageResult<StagedFile> {
        let mut file = self
            .retrieve(id)?
            .ok_or_else(|| StorageError::FileNotFound(id.to_string()))?;
        file.rewind()?;
        Ok(file)
    }
}
