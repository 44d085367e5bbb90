//! scpstore - pluggable file storage over scp
//!
//! Storage backends for file attachments. The scp backend moves every blob
//! through a local staged file and an external copy command, locally or to a
//! remote host over ssh.

pub mod cli;
pub mod file_storage;
pub mod logging;
