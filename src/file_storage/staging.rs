//! # Local Staging
//!
//! Every transfer goes through a local temporary file. A `StagedFile` is
//! removed from disk when dropped, so a staged file that never reaches the
//! caller is cleaned up on every path, error paths included.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::errors::{StorageResult, TransferError};

const TEMP_PREFIX: &str = "scpstore-";

/// Local temporary file used as a transfer buffer.
#[derive(Debug)]
pub struct StagedFile {
    inner: NamedTempFile,
}

impl StagedFile {
    /// Create an empty staged file named after the identifier's extension.
    pub fn create(id: &str) -> StorageResult<Self> {
        let suffix = extension_suffix(id);
        let inner = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile()?;
        Ok(Self { inner })
    }

    /// Copy all of `reader` into a fresh staged file, rewound for reading.
    pub fn materialize(reader: &mut dyn Read, id: &str) -> StorageResult<Self> {
        let mut staged = Self::create(id)?;
        io::copy(reader, staged.inner.as_file_mut()).map_err(|e| TransferError::Stream {
            reason: e.to_string(),
        })?;
        staged.inner.as_file_mut().flush()?;
        staged.rewind()?;
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    pub fn as_file(&self) -> &File {
        self.inner.as_file()
    }

    /// Seek back to the first byte.
    pub fn rewind(&mut self) -> StorageResult<()> {
        self.inner.as_file_mut().seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Apply permission bits to the staged file.
    #[cfg(unix)]
    pub fn set_permissions(&self, mode: u32) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(self.path(), std::fs::Permissions::from_mode(mode))?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn set_permissions(&self, _mode: u32) -> StorageResult<()> {
        Ok(())
    }

    /// Read the whole file from the start, leaving the cursor at the end.
    pub fn read_all(&mut self) -> StorageResult<Vec<u8>> {
        self.rewind()?;
        let mut buf = Vec::new();
        self.inner.as_file_mut().read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Move the staged file to a permanent location.
    ///
    /// Falls back to copying when the target is on another filesystem.
    pub fn persist(mut self, target: &Path) -> StorageResult<File> {
        match self.inner.persist(target) {
            Ok(file) => Ok(file),
            Err(err) => {
                self.inner = err.file;
                self.rewind()?;
                let mut out = File::create(target)?;
                io::copy(self.inner.as_file_mut(), &mut out)?;
                Ok(out)
            }
        }
    }
}

impl Read for StagedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.as_file_mut().read(buf)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.as_file_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.as_file_mut().flush()
    }
}

impl Seek for StagedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.as_file_mut().seek(pos)
    }
}

fn extension_suffix(id: &str) -> String {
    Path::new(id)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
