//! # Mura
//!
//! Extracts the mura calibration blob of the Galileo display panel from the
//! firmware region mapped into physical memory, after making sure the tool
//! runs on the right hardware.
//!
//! This crate re-exports [`mura_core`]. The command line tools live in the
//! `mura-bin` package:
//!
//! ```sh
//! cargo build --release -p mura-bin
//! sudo chown root target/release/mura_extract
//! sudo chmod u+s target/release/mura_extract
//! target/release/mura_extract
//! ```
//!
//! ## Features
//!
//! - `tdm`: additionally read the panel TDM register and report the number of
//!   gamma calibration points.

pub use mura_core::*;
