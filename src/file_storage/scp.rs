//! # Scp Backend
//!
//! Stores files by shelling out to `scp`, either into a local directory or
//! onto a remote host over ssh. There is no atomic rename: a reader racing a
//! writer on the same identifier may see a partial file.

use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::StorageBackend;
use super::config::ScpConfig;
use super::errors::StorageResult;
use super::path::{self, PathResolver};
use super::staging::StagedFile;
use super::transport::{single_quote, CommandTransport, CopyPath, TransportClient, TransportMode};

/// Storage backend transferring through an external copy command
#[derive(Debug, Clone)]
pub struct ScpBackend {
    resolver: PathResolver,
    transport: Arc<dyn TransportClient>,
    permissions: u32,
}

impl ScpBackend {
    /// Create a backend from configuration.
    ///
    /// Fails with a configuration error if the copy binary (or, in remote
    /// mode, the remote shell) cannot be found.
    pub fn new(config: ScpConfig) -> StorageResult<Self> {
        config.validate()?;

        let mode = TransportMode::from_endpoint(config.ssh_host.as_deref());
        let transport = CommandTransport::new(
            mode,
            &config.copy_binary,
            config.options.clone(),
            &config.remote_shell,
        )?;
        let resolver = PathResolver::new(
            &config.directory,
            config.host.as_deref(),
            config.prefix.as_deref(),
        );

        Ok(Self::with_transport(resolver, Arc::new(transport), config.permissions))
    }

    /// Create a backend over an arbitrary transport
    pub fn with_transport(
        resolver: PathResolver,
        transport: Arc<dyn TransportClient>,
        permissions: u32,
    ) -> Self {
        Self {
            resolver,
            transport,
            permissions,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn permissions(&self) -> u32 {
        self.permissions
    }

    /// Resolved storage path for `id`
    pub fn path(&self, id: &str) -> String {
        self.resolver.path(id)
    }
}

impl StorageBackend for ScpBackend {
    fn store(&self, io: &mut dyn Read, id: &str) -> StorageResult<StagedFile> {
        let mut file = StagedFile::materialize(io, id)?;
        file.set_permissions(self.permissions)?;

        let destination = self.resolver.path(id);
        // Not checked: a missing directory makes the copy fail instead.
        self.transport
            .shell_exec(&format!("mkdir -p {}", single_quote(path::parent(&destination))));

        if let Err(e) = self
            .transport
            .copy(CopyPath::Staged(file.path()), CopyPath::Stored(&destination))
        {
            warn!(id, path = %destination, error = %e, "store failed");
            return Err(e.into());
        }

        debug!(id, path = %destination, "stored");
        file.rewind()?;
        Ok(file)
    }

    fn retrieve(&self, id: &str) -> StorageResult<Option<StagedFile>> {
        let source = self.resolver.path(id);
        let file = StagedFile::create(id)?;

        match self
            .transport
            .copy(CopyPath::Stored(&source), CopyPath::Staged(file.path()))
        {
            Ok(()) => Ok(Some(file)),
            Err(e) => {
                debug!(id, path = %source, error = %e, "retrieve came back empty");
                Ok(None)
            }
        }
    }

    fn exists(&self, id: &str) -> bool {
        self.transport
            .shell_exec(&format!("ls -la {}", single_quote(&self.resolver.path(id))))
    }

    fn delete(&self, id: &str) {
        let target = self.resolver.path(id);
        let command = format!("rm -rf {}", single_quote(&target));
        if let Err(e) = self.transport.run_remote_command(&command) {
            debug!(id, path = %target, error = %e, "delete failed");
        }
    }

    fn delete_all(&self) {
        // Only the directory is quoted so the wildcard still expands.
        let target = self.resolver.path("*");
        let command = format!("rm -rf {}/*", single_quote(path::parent(&target)));
        if let Err(e) = self.transport.run_remote_command(&command) {
            debug!(path = %target, error = %e, "delete_all failed");
        }
    }

    fn url(&self, id: &str) -> String {
        self.resolver.url(id)
    }
}
