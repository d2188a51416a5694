use log::{info, warn};
use serde::Serialize;

use crate::buffer::{ReadLen, read_file};
use crate::config::PlatformConfig;
use crate::error::{MuraError, Result};

/// DMI identity strings of the running machine.
///
/// Values are kept as read, including the trailing newline sysfs appends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HardwareIdentity {
    /// System vendor
    pub vendor: String,
    /// Product name
    pub product: String,
    /// Product serial, if readable
    pub serial: Option<String>,
}

impl HardwareIdentity {
    /// Reads vendor, product and serial from the DMI attributes in `config`.
    ///
    /// The serial is optional: failure to read it is logged and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if vendor or product cannot be read.
    pub fn load(config: &PlatformConfig) -> Result<Self> {
        let vendor = read_file(&config.sys_vendor, 0, ReadLen::ToEnd)?;
        let product = read_file(&config.product_name, 0, ReadLen::ToEnd)?;
        let serial = match read_file(&config.product_serial, 0, ReadLen::ToEnd) {
            Ok(serial) if !serial.is_empty() => Some(serial.to_string_lossy().into_owned()),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to read product serial: {}", e);
                None
            }
        };
        Ok(HardwareIdentity {
            vendor: vendor.to_string_lossy().into_owned(),
            product: product.to_string_lossy().into_owned(),
            serial,
        })
    }

    /// Checks that vendor and product belong to the expected platform.
    ///
    /// # Errors
    ///
    /// Returns [`MuraError::PlatformMismatch`] for the first field that does
    /// not match.
    pub fn verify(&self, config: &PlatformConfig) -> Result<()> {
        check_field("Vendor", &self.vendor, &config.expected_vendor)?;
        check_field("Product", &self.product, &config.expected_product)?;
        info!(
            "Platform verified: {} {}",
            self.vendor.trim_end(),
            self.product.trim_end()
        );
        Ok(())
    }
}

/// Compares `actual` byte for byte against `expected`, up to the length of
/// `actual`. An empty value never matches.
fn matches_expected(actual: &[u8], expected: &[u8]) -> bool {
    !actual.is_empty() && expected.starts_with(actual)
}

fn check_field(field: &'static str, actual: &str, expected: &str) -> Result<()> {
    if matches_expected(actual.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(MuraError::PlatformMismatch {
            field,
            actual: actual.to_string(),
            expected: expected.to_string(),
        })
    }
}
