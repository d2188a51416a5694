use std::os::unix::fs::chown;
use std::path::Path;

use log::{debug, info};

use crate::buffer::{ByteBuffer, ReadLen, read_file, write_file};
use crate::config::PlatformConfig;
use crate::error::{ExtractError, ExtractStep, MuraError, Result};
use crate::identity::HardwareIdentity;
use crate::panel::PanelIdentity;
#[cfg(feature = "tdm")]
use crate::panel::Tdm;
use crate::report::ExtractionReport;

/// The mura calibration blob, exactly as stored in the firmware region.
#[derive(Debug)]
pub struct MuraBlob(ByteBuffer);

impl MuraBlob {
    /// Reads the blob from physical memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory device cannot be read or yields fewer
    /// than `config.blob_size` bytes.
    pub fn read(config: &PlatformConfig) -> Result<Self> {
        debug!(
            "Reading {} bytes at 0x{:x} from {}",
            config.blob_size,
            config.blob_offset,
            config.mem.display()
        );
        let data = read_file(
            &config.mem,
            config.blob_offset,
            ReadLen::Exact(config.blob_size),
        )?;
        Ok(MuraBlob(data))
    }

    /// Size of the blob in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the blob holds no data.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Blob contents.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Writes the blob verbatim to `path`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist(self, path: &Path) -> Result<usize> {
        write_file(path, self.0.as_bytes())?;
        info!("Wrote mura blob to {}", path.display());
        Ok(self.0.len())
    }
}

/// Who owns the output file after it was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Hand the file to the given user and group.
    TransferTo {
        /// Target user id
        uid: u32,
        /// Target group id
        gid: u32,
    },
    /// Leave the file owned by the process.
    Keep,
}

impl Ownership {
    /// Applies the ownership policy to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MuraError::Ownership`] if the owner cannot be changed.
    pub fn apply(&self, path: &Path) -> Result<()> {
        match *self {
            Ownership::TransferTo { uid, gid } => {
                chown(path, Some(uid), Some(gid)).map_err(|source| MuraError::Ownership {
                    path: path.to_path_buf(),
                    uid,
                    gid,
                    source,
                })?;
                debug!("Changed owner of {} to {}:{}", path.display(), uid, gid);
                Ok(())
            }
            Ownership::Keep => Ok(()),
        }
    }
}

/// Runs the extraction: verify the platform, identify the panel, copy the
/// blob out of physical memory and hand it to the invoking user.
///
/// Everything that can reject the platform happens before the output file is
/// touched.
pub struct MuraExtractor {
    config: PlatformConfig,
    ownership: Ownership,
}

impl MuraExtractor {
    /// Creates an extractor that leaves ownership of the output untouched.
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            ownership: Ownership::Keep,
        }
    }

    /// Sets the ownership policy for the output file.
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Platform configuration in use.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Extracts the mura blob to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step, tagged with that step. Once the
    /// blob was written, a later failure leaves the file in place.
    pub fn run(&self, out: &Path) -> std::result::Result<ExtractionReport, ExtractError> {
        let identity = HardwareIdentity::load(&self.config)
            .map_err(|e| e.during(ExtractStep::ReadIdentity))?;
        identity
            .verify(&self.config)
            .map_err(|e| e.during(ExtractStep::VerifyPlatform))?;

        let panel = PanelIdentity::probe(&self.config)
            .map_err(|e| e.during(ExtractStep::ReadPanelId))?;
        #[cfg(feature = "tdm")]
        let tdm = Some(Tdm::probe(&self.config).map_err(|e| e.during(ExtractStep::ReadTdm))?);
        #[cfg(not(feature = "tdm"))]
        let tdm = None;

        let blob = MuraBlob::read(&self.config).map_err(|e| e.during(ExtractStep::ReadBlob))?;
        let blob_size = blob
            .persist(out)
            .map_err(|e| e.during(ExtractStep::WriteBlob))?;
        self.ownership
            .apply(out)
            .map_err(|e| e.during(ExtractStep::SetOwnership))?;

        Ok(ExtractionReport::new(
            out.to_path_buf(),
            blob_size,
            identity,
            panel,
            tdm,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;

    #[test]
    fn blob_read_requires_full_size() {
        let dir = tempfile::tempdir().unwrap();
        let mem = dir.path().join("mem");
        std::fs::write(&mem, vec![0xAAu8; 0x1000 + 100]).unwrap();
        let config = PlatformConfig {
            mem,
            blob_offset: 0x1000,
            blob_size: 200,
            ..PlatformConfig::galileo()
        };
        let err = MuraBlob::read(&config).unwrap_err();
        assert!(matches!(
            err,
            MuraError::ShortRead {
                expected: 200,
                actual: 100,
                ..
            }
        ));
    }

    #[test]
    fn blob_read_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mem = dir.path().join("mem");
        let contents: Vec<u8> = (0..0x2000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&mem, &contents).unwrap();
        let config = PlatformConfig {
            mem,
            blob_offset: 0x1000,
            blob_size: 0x800,
            ..PlatformConfig::galileo()
        };
        let blob = MuraBlob::read(&config).unwrap();
        assert_eq!(blob.len(), 0x800);
        assert_eq!(blob.as_bytes(), &contents[0x1000..0x1800]);

        let out = dir.path().join("blob.tar");
        assert_eq!(blob.persist(&out).unwrap(), 0x800);
        assert_eq!(std::fs::read(&out).unwrap(), &contents[0x1000..0x1800]);
    }

    #[test]
    fn transfer_to_current_user() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
        Ownership::TransferTo { uid, gid }
            .apply(file.path())
            .unwrap();
        let meta = std::fs::metadata(file.path()).unwrap();
        assert_eq!(meta.uid(), uid);
        assert_eq!(meta.gid(), gid);
    }

    #[test]
    fn transfer_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ownership::TransferTo { uid: 0, gid: 0 }
            .apply(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, MuraError::Ownership { uid: 0, gid: 0, .. }));
    }

    #[test]
    fn keep_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Ownership::Keep.apply(&dir.path().join("missing")).is_ok());
    }
}
