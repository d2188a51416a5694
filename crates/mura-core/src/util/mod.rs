//! Constants and small helpers shared across the extractor.
//!
//! Every device path, register offset, size and magic value the extractor
//! relies on lives in [`constants`] so that a platform variant only has to
//! touch this module (or build its own [`PlatformConfig`](crate::PlatformConfig)).

mod constants;

pub use self::constants::*;

/// Formats bytes as contiguous uppercase hex, two digits per byte.
///
/// # Examples
///
/// ```
/// use mura_core::util::hex_upper;
///
/// assert_eq!(hex_upper(&[0x04, 0x75, 0xab]), "0475AB");
/// ```
pub fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
