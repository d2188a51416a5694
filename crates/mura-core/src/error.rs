use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

/// File operation that failed, used to build error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoOp {
    /// Opening the file
    Open,
    /// Seeking within the file
    Seek,
    /// Reading from the file
    Read,
    /// Writing to the file
    Write,
    /// Flushing the file to disk
    Sync,
    /// Closing the file
    Close,
}

impl Display for IoOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            IoOp::Open => "open",
            IoOp::Seek => "seek in",
            IoOp::Read => "read",
            IoOp::Write => "write to",
            IoOp::Sync => "sync",
            IoOp::Close => "close",
        };
        f.write_str(op)
    }
}

/// Errors that can occur while extracting the mura blob.
///
/// Every variant is fatal for the extractor.
#[derive(Debug, Error)]
pub enum MuraError {
    /// The process does not run with effective root.
    #[error("Must be run as root via suid (effective uid is {euid})")]
    NotPrivileged {
        /// Effective user id of the process
        euid: u32,
    },
    /// A DMI identity string does not match the expected platform.
    #[error("{field} didn't match. Was: {actual:?} Expected: {expected:?}")]
    PlatformMismatch {
        /// Which identity field mismatched
        field: &'static str,
        /// The value that was read
        actual: String,
        /// The value that was expected
        expected: String,
    },
    /// An OS-level I/O operation failed.
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        /// The failed operation
        op: IoOp,
        /// File the operation was performed on
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// The requested offset lies at or behind the end of the file.
    #[error("Tried to seek to an invalid offset 0x{offset:x} in {} (end is 0x{end:x})", .path.display())]
    InvalidOffset {
        /// File that was read
        path: PathBuf,
        /// Requested start offset
        offset: u64,
        /// End position reported by the file
        end: u64,
    },
    /// Fewer bytes than required were read.
    #[error("Short read from {}: expected {expected} bytes, got {actual}", .path.display())]
    ShortRead {
        /// File that was read
        path: PathBuf,
        /// Number of bytes required
        expected: usize,
        /// Number of bytes actually read
        actual: usize,
    },
    /// Changing the owner of the output file failed.
    #[error("Failed to set ownership of {} to {uid}:{gid}: {source}", .path.display())]
    Ownership {
        /// Output file
        path: PathBuf,
        /// Target user id
        uid: u32,
        /// Target group id
        gid: u32,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

impl MuraError {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MuraError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Step of the extraction pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractStep {
    /// Reading the DMI identity strings
    ReadIdentity,
    /// Comparing the identity against the expected platform
    VerifyPlatform,
    /// Reading the panel unique id
    ReadPanelId,
    /// Reading the panel TDM bytes
    ReadTdm,
    /// Reading the blob from physical memory
    ReadBlob,
    /// Writing the blob to the output file
    WriteBlob,
    /// Handing the output file to the invoking user
    SetOwnership,
}

impl Display for ExtractStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ExtractStep::ReadIdentity => "Failed to get platform identity",
            ExtractStep::VerifyPlatform => "Not running on the expected platform",
            ExtractStep::ReadPanelId => "Failed to get display serial",
            ExtractStep::ReadTdm => "Failed to get display tdm",
            ExtractStep::ReadBlob => "Failed to get mura blob",
            ExtractStep::WriteBlob => "Failed to write mura blob",
            ExtractStep::SetOwnership => "Failed to set permissions for mura blob",
        };
        f.write_str(msg)
    }
}

/// A [`MuraError`] together with the pipeline step it stopped.
#[derive(Debug, Error)]
#[error("{step}")]
pub struct ExtractError {
    step: ExtractStep,
    #[source]
    source: MuraError,
}

impl ExtractError {
    /// The step that failed.
    pub fn step(&self) -> ExtractStep {
        self.step
    }

    /// The underlying error.
    pub fn kind(&self) -> &MuraError {
        &self.source
    }

    /// Consumes the error and returns the underlying one.
    pub fn into_inner(self) -> MuraError {
        self.source
    }
}

impl MuraError {
    /// Attributes this error to a pipeline step.
    pub(crate) fn during(self, step: ExtractStep) -> ExtractError {
        ExtractError { step, source: self }
    }
}

/// Result type of the mura extractor.
pub type Result<T> = std::result::Result<T, MuraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_operation_and_path() {
        let err = MuraError::io(
            IoOp::Seek,
            "/dev/mem",
            std::io::Error::from_raw_os_error(libc::EINVAL),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to seek in /dev/mem: "), "{msg}");
    }

    #[test]
    fn close_and_sync_are_distinct() {
        let close = MuraError::io(
            IoOp::Close,
            "/tmp/mura/blob.tar",
            std::io::Error::from_raw_os_error(libc::EIO),
        );
        assert!(close.to_string().starts_with("Failed to close /tmp/mura/blob.tar: "));
        assert_eq!(IoOp::Sync.to_string(), "sync");
    }

    #[test]
    fn extract_error_names_step_and_keeps_cause() {
        use std::error::Error as _;

        let err = MuraError::ShortRead {
            path: "/dev/mem".into(),
            expected: 2_097_152,
            actual: 4096,
        }
        .during(ExtractStep::ReadBlob);
        assert_eq!(err.step(), ExtractStep::ReadBlob);
        assert_eq!(err.to_string(), "Failed to get mura blob");
        let cause = err.source().unwrap().to_string();
        assert_eq!(
            cause,
            "Short read from /dev/mem: expected 2097152 bytes, got 4096"
        );
        assert!(matches!(err.into_inner(), MuraError::ShortRead { .. }));
    }

    #[test]
    fn mismatch_shows_both_values() {
        let err = MuraError::PlatformMismatch {
            field: "Vendor",
            actual: "LENOVO\n".into(),
            expected: "Valve\n".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"Vendor didn't match. Was: "LENOVO\n" Expected: "Valve\n""#
        );
    }
}
