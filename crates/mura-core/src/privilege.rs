use log::debug;

use crate::error::{MuraError, Result};
use crate::extract::Ownership;

/// User and group ids of the running process.
///
/// Captured once at startup: the effective uid decides whether the extractor
/// may run at all, the real ids receive ownership of the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// Effective user id
    pub euid: u32,
    /// Real user id of the invoking user
    pub uid: u32,
    /// Real group id of the invoking user
    pub gid: u32,
}

impl Credentials {
    /// Reads the credentials of the current process.
    pub fn current() -> Self {
        // SAFETY: these calls cannot fail and have no preconditions
        let (euid, uid, gid) = unsafe { (libc::geteuid(), libc::getuid(), libc::getgid()) };
        let creds = Credentials { euid, uid, gid };
        debug!("{:?}", creds);
        creds
    }

    /// Fails unless the effective user is root.
    ///
    /// # Errors
    ///
    /// Returns [`MuraError::NotPrivileged`] if the effective uid is not 0.
    pub fn require_root(&self) -> Result<()> {
        if self.euid != 0 {
            return Err(MuraError::NotPrivileged { euid: self.euid });
        }
        Ok(())
    }

    /// Returns `true` if the process runs with another effective user than the
    /// one who started it, i.e. it was launched through a setuid binary.
    pub fn is_elevated(&self) -> bool {
        self.euid != self.uid
    }

    /// Ownership policy handing the output file to the real user and group.
    pub fn ownership(&self) -> Ownership {
        Ownership::TransferTo {
            uid: self.uid,
            gid: self.gid,
        }
    }
}
