//! # Transfer Executor
//!
//! All contact with the outside world goes through two primitives: running a
//! shell command and copying a file. Local and remote mode share the same
//! logic and differ only in how commands are wrapped and how storage-side
//! paths are addressed.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::errors::{StorageError, StorageResult, TransferError};

/// Where storage-side commands run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Local,
    RemoteOverSsh { endpoint: String },
}

impl TransportMode {
    pub fn from_endpoint(endpoint: Option<&str>) -> Self {
        match endpoint {
            Some(endpoint) => TransportMode::RemoteOverSsh {
                endpoint: endpoint.to_string(),
            },
            None => TransportMode::Local,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            TransportMode::Local => None,
            TransportMode::RemoteOverSsh { endpoint } => Some(endpoint),
        }
    }
}

/// One side of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath<'a> {
    /// A local staged file.
    Staged(&'a Path),
    /// A resolved path on the storage host.
    Stored(&'a str),
}

/// Capability to run storage-side commands and move bytes.
pub trait TransportClient: Send + Sync + fmt::Debug {
    /// Run a shell command on the storage host.
    fn run_remote_command(&self, command: &str) -> Result<(), TransferError>;

    /// Copy a file between the local machine and the storage host.
    fn copy(&self, source: CopyPath<'_>, destination: CopyPath<'_>) -> Result<(), TransferError>;

    /// Exit-status-only view of `run_remote_command`.
    fn shell_exec(&self, command: &str) -> bool {
        self.run_remote_command(command).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellTarget {
    Local,
    Remote { program: PathBuf, endpoint: String },
}

/// Executor backed by real child processes (`scp` + `ssh` by default).
#[derive(Debug, Clone)]
pub struct CommandTransport {
    target: ShellTarget,
    copy_binary: PathBuf,
    copy_args: Vec<String>,
}

impl CommandTransport {
    /// Build an executor, resolving binaries once.
    ///
    /// The remote shell is only resolved in remote mode.
    pub fn new(
        mode: TransportMode,
        copy_binary: &str,
        copy_args: Vec<String>,
        remote_shell: &str,
    ) -> StorageResult<Self> {
        let copy_binary = resolve_binary(copy_binary)?;
        let target = match mode {
            TransportMode::Local => ShellTarget::Local,
            TransportMode::RemoteOverSsh { endpoint } => ShellTarget::Remote {
                program: resolve_binary(remote_shell)?,
                endpoint,
            },
        };

        Ok(Self {
            target,
            copy_binary,
            copy_args,
        })
    }

    pub fn mode(&self) -> TransportMode {
        match &self.target {
            ShellTarget::Local => TransportMode::Local,
            ShellTarget::Remote { endpoint, .. } => TransportMode::RemoteOverSsh {
                endpoint: endpoint.clone(),
            },
        }
    }

    pub fn copy_binary(&self) -> &Path {
        &self.copy_binary
    }

    /// Program and arguments used to run `command` on the storage host.
    ///
    /// The inner command's own output is discarded and its exit status is
    /// echoed, so only that status crosses the wire.
    pub fn shell_invocation(&self, command: &str) -> (OsString, Vec<OsString>) {
        let inner = format!("bash -c {} > /dev/null 2>&1; echo $?", single_quote(command));
        match &self.target {
            ShellTarget::Local => ("sh".into(), vec!["-c".into(), inner.into()]),
            ShellTarget::Remote { program, endpoint } => (
                program.clone().into_os_string(),
                vec![endpoint.into(), inner.into()],
            ),
        }
    }

    /// Arguments passed to the copy binary.
    pub fn copy_invocation(&self, source: CopyPath<'_>, destination: CopyPath<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.copy_args.iter().map(OsString::from).collect();
        args.push(self.copy_arg(source));
        args.push(self.copy_arg(destination));
        args
    }

    fn copy_arg(&self, path: CopyPath<'_>) -> OsString {
        match (path, &self.target) {
            (CopyPath::Staged(local), _) => local.as_os_str().to_owned(),
            (CopyPath::Stored(stored), ShellTarget::Remote { endpoint, .. }) => {
                format!("{}:{}", endpoint, stored).into()
            }
            (CopyPath::Stored(stored), ShellTarget::Local) => stored.into(),
        }
    }
}

impl TransportClient for CommandTransport {
    fn run_remote_command(&self, command: &str) -> Result<(), TransferError> {
        let (program, args) = self.shell_invocation(command);
        let program_name = program.to_string_lossy().to_string();
        debug!(program = %program_name, command, "running shell command");

        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TransferError::Spawn {
                program: program_name.clone(),
                reason: e.to_string(),
            })?;

        let echoed = String::from_utf8_lossy(&output.stdout);
        let echoed = echoed.trim();
        if echoed == "0" {
            return Ok(());
        }

        Err(TransferError::NonZeroExit {
            program: program_name,
            code: echoed.parse().ok().or_else(|| output.status.code()),
            stderr: stderr_of(&output),
        })
    }

    fn copy(&self, source: CopyPath<'_>, destination: CopyPath<'_>) -> Result<(), TransferError> {
        let args = self.copy_invocation(source, destination);
        let program_name = self.copy_binary.display().to_string();
        debug!(program = %program_name, ?args, "copying");

        let output = Command::new(&self.copy_binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TransferError::Spawn {
                program: program_name.clone(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TransferError::NonZeroExit {
                program: program_name,
                code: output.status.code(),
                stderr: stderr_of(&output),
            })
        }
    }
}

/// Locate an executable by path or by searching `$PATH`.
pub fn resolve_binary(name: &str) -> StorageResult<PathBuf> {
    let found = if name.contains('/') {
        let candidate = PathBuf::from(name);
        is_executable_file(&candidate).then_some(candidate)
    } else {
        find_in_path(name)
    };

    found.ok_or_else(|| StorageError::Configuration(format!("{} could not be found", name)))
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Wrap in single quotes for `sh`, escaping embedded quotes.
///
/// Keeps a resolved path a single shell word on the storage host.
pub fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> CommandTransport {
        CommandTransport {
            target: ShellTarget::Local,
            copy_binary: PathBuf::from("/usr/bin/scp"),
            copy_args: vec!["-q".to_string()],
        }
    }

    fn remote() -> CommandTransport {
        CommandTransport {
            target: ShellTarget::Remote {
                program: PathBuf::from("/usr/bin/ssh"),
                endpoint: "user@remote".to_string(),
            },
            ..local()
        }
    }

    #[test]
    fn test_mode_from_endpoint() {
        assert_eq!(TransportMode::from_endpoint(None), TransportMode::Local);
        let mode = TransportMode::from_endpoint(Some("user@remote"));
        assert_eq!(mode.endpoint(), Some("user@remote"));
        assert_eq!(remote().mode(), mode);
    }

    #[test]
    fn test_local_copy_arguments() {
        let staged = Path::new("/tmp/scpstore-abc.txt");
        let args = local().copy_invocation(
            CopyPath::Staged(staged),
            CopyPath::Stored("/tmp/store/uploads/a.txt"),
        );
        assert_eq!(args, vec!["-q", "/tmp/scpstore-abc.txt", "/tmp/store/uploads/a.txt"]);
    }

    #[test]
    fn test_remote_copy_prefixes_storage_side() {
        let staged = Path::new("/tmp/scpstore-abc.txt");

        let up = remote().copy_invocation(
            CopyPath::Staged(staged),
            CopyPath::Stored("/tmp/store/uploads/a.txt"),
        );
        assert_eq!(up[2], "user@remote:/tmp/store/uploads/a.txt");
        assert_eq!(up[1], "/tmp/scpstore-abc.txt");

        let down = remote().copy_invocation(
            CopyPath::Stored("/tmp/store/uploads/a.txt"),
            CopyPath::Staged(staged),
        );
        assert_eq!(down[1], "user@remote:/tmp/store/uploads/a.txt");
        assert_eq!(down[2], "/tmp/scpstore-abc.txt");
    }

    #[test]
    fn test_shell_invocation_wrapping() {
        let (program, args) = local().shell_invocation("ls -la /tmp/store/a.txt");
        assert_eq!(program, "sh");
        assert_eq!(
            args,
            vec!["-c", "bash -c 'ls -la /tmp/store/a.txt' > /dev/null 2>&1; echo $?"]
        );

        let (program, args) = remote().shell_invocation("rm -rf /tmp/store/*");
        assert_eq!(program, "/usr/bin/ssh");
        assert_eq!(args[0], "user@remote");
        assert_eq!(args[1], "bash -c 'rm -rf /tmp/store/*' > /dev/null 2>&1; echo $?");
    }

    #[test]
    fn test_single_quote_escaping() {
        assert_eq!(single_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_missing_binary_is_configuration_error() {
        let err = resolve_binary("scpstore-definitely-not-installed").unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
        assert!(err.is_fatal());

        let err = CommandTransport::new(
            TransportMode::Local,
            "/nonexistent/scp",
            Vec::new(),
            "ssh",
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_local_shell_exit_status() {
        let transport = CommandTransport::new(TransportMode::Local, "cp", Vec::new(), "ssh").unwrap();
        assert_eq!(transport.mode(), TransportMode::Local);

        assert!(transport.shell_exec("true"));
        assert!(!transport.shell_exec("false"));

        let err = transport.run_remote_command("exit 3").unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_reports_status() {
        let transport = CommandTransport::new(TransportMode::Local, "cp", Vec::new(), "ssh").unwrap();
        let missing = Path::new("/nonexistent/scpstore/source");
        let err = transport
            .copy(CopyPath::Staged(missing), CopyPath::Stored("/nonexistent/scpstore/dest"))
            .unwrap_err();

        assert!(matches!(err, TransferError::NonZeroExit { .. }));
        assert!(err.exit_code().is_some());
    }
}
