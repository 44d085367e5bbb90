//! # Backend Configuration
//!
//! JSON configuration for the scp backend:
//!
//! ```json
//! {
//!   "directory": "/var/www/uploads",
//!   "ssh_host": "deploy@files.example.com",
//!   "host": "//cdn.example.com",
//!   "prefix": "attachments",
//!   "options": ["-q", "-P", "2222"],
//!   "permissions": "0640"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::{StorageError, StorageResult};

/// Configuration for [`ScpBackend`](super::scp::ScpBackend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScpConfig {
    /// Root directory files are transferred to (required)
    pub directory: String,

    /// `user@host` for transfers over ssh; local copies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_host: Option<String>,

    /// URL host, e.g. a CDN (`//abc123.cloudfront.net`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Subdirectory of `directory`, also part of the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Extra arguments for the copy binary (default: `["-q"]`)
    #[serde(default = "default_options")]
    pub options: Vec<String>,

    /// Permission bits set on uploaded files (default: 0o600)
    #[serde(default = "default_permissions", deserialize_with = "deserialize_mode")]
    pub permissions: u32,

    /// Copy binary name or path (default: "scp")
    #[serde(default = "default_copy_binary")]
    pub copy_binary: String,

    /// Remote shell binary name or path (default: "ssh")
    #[serde(default = "default_remote_shell")]
    pub remote_shell: String,
}

fn default_options() -> Vec<String> {
    vec!["-q".to_string()]
}

fn default_permissions() -> u32 {
    0o600
}

fn default_copy_binary() -> String {
    "scp".to_string()
}

fn default_remote_shell() -> String {
    "ssh".to_string()
}

/// Accept either a JSON integer or an octal string such as `"0600"`.
fn deserialize_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Mode {
        Bits(u32),
        Octal(String),
    }

    match Mode::deserialize(deserializer)? {
        Mode::Bits(bits) => Ok(bits),
        Mode::Octal(s) => {
            let digits = s.trim_start_matches("0o");
            u32::from_str_radix(digits, 8).map_err(|_| {
                serde::de::Error::custom(format!("invalid octal permissions: {}", s))
            })
        }
    }
}

impl ScpConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            ssh_host: None,
            host: None,
            prefix: None,
            options: default_options(),
            permissions: default_permissions(),
            copy_binary: default_copy_binary(),
            remote_shell: default_remote_shell(),
        }
    }

    pub fn with_ssh_host(mut self, ssh_host: impl Into<String>) -> Self {
        self.ssh_host = Some(ssh_host.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_copy_binary(mut self, copy_binary: impl Into<String>) -> Self {
        self.copy_binary = copy_binary.into();
        self
    }

    pub fn with_remote_shell(mut self, remote_shell: impl Into<String>) -> Self {
        self.remote_shell = remote_shell.into();
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StorageError::Configuration(format!("Failed to read config: {}", e))
        })?;

        let config: ScpConfig = serde_json::from_str(&content)
            .map_err(|e| StorageError::Configuration(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.directory.is_empty() {
            return Err(StorageError::Configuration(
                "directory must not be empty".to_string(),
            ));
        }

        if matches!(self.ssh_host.as_deref(), Some(h) if h.trim().is_empty()) {
            return Err(StorageError::Configuration(
                "ssh_host must not be empty when set".to_string(),
            ));
        }

        if self.permissions > 0o7777 {
            return Err(StorageError::Configuration(format!(
                "permissions out of range: {:o}",
                self.permissions
            )));
        }

        Ok(())
    }
}
