//! Bounded reads from files and device nodes, and whole-buffer writes.
//!
//! The same reader serves sysfs attributes, the DP aux character device and
//! `/dev/mem`. How a short read is treated differs per call site, so callers
//! state it explicitly through [`ReadLen`].

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::IntoRawFd;
use std::path::Path;

use log::debug;

use crate::error::{IoOp, MuraError, Result};

/// How many bytes [`read_file`] should read, and whether fewer is acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadLen {
    /// Everything from the offset to the end of the file.
    ///
    /// The end is determined by seeking, so the offset must lie before it.
    /// Fewer bytes than the seek suggested is fine (sysfs attributes report a
    /// page-sized length).
    ToEnd,
    /// Up to `n` bytes; a short read at end-of-file is accepted.
    AtMost(usize),
    /// Exactly `n` bytes; anything less is [`MuraError::ShortRead`].
    Exact(usize),
}

/// An owned chunk of bytes produced by a single read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteBuffer(Vec<u8>);

impl ByteBuffer {
    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was read.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the buffer and returns the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Interprets the contents as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(value: Vec<u8>) -> Self {
        ByteBuffer(value)
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reads bytes from `path` starting at `offset`.
///
/// # Arguments
///
/// * `path` - File or device node to read
/// * `offset` - Byte offset to start reading at
/// * `len` - How much to read, see [`ReadLen`]
///
/// # Errors
///
/// Returns [`MuraError::Io`] if opening, seeking, reading or closing fails,
/// [`MuraError::InvalidOffset`] if `offset` is not before the end of the file
/// for [`ReadLen::ToEnd`], and [`MuraError::ShortRead`] if fewer bytes than
/// required were read for [`ReadLen::Exact`].
pub fn read_file(path: impl AsRef<Path>, offset: u64, len: ReadLen) -> Result<ByteBuffer> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| MuraError::io(IoOp::Open, path, e))?;

    let limit = match len {
        ReadLen::ToEnd => {
            let end = file
                .seek(SeekFrom::End(0))
                .map_err(|e| MuraError::io(IoOp::Seek, path, e))?;
            if end <= offset {
                return Err(MuraError::InvalidOffset {
                    path: path.to_path_buf(),
                    offset,
                    end,
                });
            }
            (end - offset) as usize
        }
        ReadLen::AtMost(n) | ReadLen::Exact(n) => n,
    };

    file.seek(SeekFrom::Start(offset))
        .map_err(|e| MuraError::io(IoOp::Seek, path, e))?;

    let mut data = Vec::with_capacity(limit);
    (&mut file)
        .take(limit as u64)
        .read_to_end(&mut data)
        .map_err(|e| MuraError::io(IoOp::Read, path, e))?;
    close(file, path)?;
    debug!(
        "Read {} of {} bytes from {} at 0x{:x}",
        data.len(),
        limit,
        path.display(),
        offset
    );

    if let ReadLen::Exact(expected) = len {
        if data.len() != expected {
            return Err(MuraError::ShortRead {
                path: path.to_path_buf(),
                expected,
                actual: data.len(),
            });
        }
    }
    Ok(ByteBuffer(data))
}

/// Writes `data` to `path`, creating or truncating it.
///
/// The file is synced and closed explicitly so that deferred write errors are
/// reported here. Nothing is rolled back on failure; the destination may be
/// left truncated.
///
/// # Errors
///
/// Returns [`MuraError::Io`] if opening, writing, syncing or closing fails.
pub fn write_file(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| MuraError::io(IoOp::Open, path, e))?;
    file.write_all(data)
        .map_err(|e| MuraError::io(IoOp::Write, path, e))?;
    file.sync_all()
        .map_err(|e| MuraError::io(IoOp::Sync, path, e))?;
    close(file, path)?;
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Closes `file`, reporting the error that dropping it would discard.
fn close(file: File, path: &Path) -> Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: `fd` was released by `file` and is closed exactly once
    if unsafe { libc::close(fd) } != 0 {
        return Err(MuraError::io(
            IoOp::Close,
            path,
            std::io::Error::last_os_error(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(contents).expect("write");
        file
    }

    #[test]
    fn to_end_reads_whole_file() {
        let file = file_with(b"Valve\n");
        let buf = read_file(file.path(), 0, ReadLen::ToEnd).unwrap();
        assert_eq!(buf.as_bytes(), b"Valve\n");
        assert_eq!(buf.to_string_lossy(), "Valve\n");
    }

    #[test]
    fn to_end_reads_remainder_after_offset() {
        let file = file_with(b"0123456789");
        let buf = read_file(file.path(), 4, ReadLen::ToEnd).unwrap();
        assert_eq!(buf.as_bytes(), b"456789");
    }

    #[test]
    fn to_end_rejects_offset_at_end() {
        let file = file_with(b"abc");
        let err = read_file(file.path(), 3, ReadLen::ToEnd).unwrap_err();
        assert!(matches!(
            err,
            MuraError::InvalidOffset {
                offset: 3,
                end: 3,
                ..
            }
        ));
    }

    #[test]
    fn to_end_rejects_empty_file() {
        let file = file_with(b"");
        let err = read_file(file.path(), 0, ReadLen::ToEnd).unwrap_err();
        assert!(matches!(err, MuraError::InvalidOffset { .. }));
    }

    #[test]
    fn at_most_accepts_short_read_at_eof() {
        let file = file_with(b"abcdef");
        let buf = read_file(file.path(), 2, ReadLen::AtMost(16)).unwrap();
        assert_eq!(buf.as_bytes(), b"cdef");
    }

    #[test]
    fn exact_reads_window() {
        let file = file_with(b"xxSEDSabc");
        let buf = read_file(file.path(), 2, ReadLen::Exact(4)).unwrap();
        assert_eq!(buf.as_bytes(), b"SEDS");
    }

    #[test]
    fn exact_rejects_short_read() {
        let file = file_with(b"abcdef");
        let err = read_file(file.path(), 4, ReadLen::Exact(4)).unwrap_err();
        assert!(matches!(
            err,
            MuraError::ShortRead {
                expected: 4,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_reports_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope");
        let err = read_file(&path, 0, ReadLen::ToEnd).unwrap_err();
        match err {
            MuraError::Io { op, path: p, source } => {
                assert_eq!(op, IoOp::Open);
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn close_of_open_file_succeeds() {
        let file = file_with(b"data");
        let handle = File::open(file.path()).unwrap();
        assert!(close(handle, file.path()).is_ok());
    }

    #[test]
    fn write_then_read_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        write_file(&path, &data).unwrap();
        let back = read_file(&path, 0, ReadLen::ToEnd).unwrap();
        assert_eq!(back.into_vec(), data);
    }

    #[test]
    fn write_truncates_existing_file() {
        let file = file_with(b"a much longer previous content");
        write_file(file.path(), b"short").unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"short");
    }

    #[test]
    fn write_into_missing_directory_fails_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("blob.tar");
        let err = write_file(&path, b"data").unwrap_err();
        assert!(matches!(err, MuraError::Io { op: IoOp::Open, .. }));
        assert!(!path.exists());
    }
}
