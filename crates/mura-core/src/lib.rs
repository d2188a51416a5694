//! # Mura Core
//!
//! `mura-core` extracts the mura (display non-uniformity) calibration blob
//! that the Galileo firmware keeps in its mapped BIOS region, and identifies
//! the internal panel the blob belongs to.
//!
//! ## Pipeline
//!
//! [`MuraExtractor::run`] performs, in order:
//!
//! 1. [`HardwareIdentity::load`] and [`HardwareIdentity::verify`] - make sure
//!    the DMI vendor and product are the expected platform.
//! 2. [`PanelIdentity::probe`] - read the panel unique id over the DP aux
//!    channel and classify manufacturer and finish.
//! 3. [`MuraBlob::read`] - copy the blob out of `/dev/mem`.
//! 4. [`MuraBlob::persist`] and [`Ownership::apply`] - write the blob and
//!    hand it to the invoking user.
//!
//! Privilege checks ([`Credentials`]) are left to the caller so that the
//! pipeline itself can run against ordinary files.
//!
//! ## Platform Support
//!
//! Linux only. Reading `/dev/mem` requires root and a kernel that permits
//! access to the firmware region.
//!
//! ## Features
//!
//! - `tdm`: also read the panel TDM register and report the number of gamma
//!   calibration points.

#![warn(missing_docs)]

pub mod buffer;
mod config;
mod error;
mod extract;
mod identity;
pub mod panel;
mod privilege;
mod report;
pub mod util;

pub use crate::config::PlatformConfig;
pub use crate::error::{ExtractError, ExtractStep, IoOp, MuraError, Result};
pub use crate::extract::{MuraBlob, MuraExtractor, Ownership};
pub use crate::identity::HardwareIdentity;
pub use crate::panel::{PanelFamily, PanelFinish, PanelIdentity, Tdm};
pub use crate::privilege::Credentials;
pub use crate::report::ExtractionReport;
