use std::path::PathBuf;

use crate::util::{
    DEV_MEM, DMI_PRODUCT_NAME, DMI_PRODUCT_SERIAL, DMI_SYS_VENDOR, DP_AUX_DEVICE,
    EXPECTED_PRODUCT, EXPECTED_VENDOR, MURA_BLOB_OFFSET, MURA_BLOB_SIZE, PANEL_TDM,
    PANEL_UNIQUE_ID_BASE,
};

/// Where the extractor finds its inputs and what it expects to find there.
///
/// [`PlatformConfig::galileo`] is the only configuration the binaries use.
/// Other instances exist for tests and for porting to a platform variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformConfig {
    /// DMI vendor attribute
    pub sys_vendor: PathBuf,
    /// DMI product attribute
    pub product_name: PathBuf,
    /// DMI serial attribute, read on a best-effort basis
    pub product_serial: PathBuf,
    /// Expected vendor string, compared up to the length read
    pub expected_vendor: String,
    /// Expected product string, compared up to the length read
    pub expected_product: String,
    /// DP aux device of the internal panel
    pub dp_aux: PathBuf,
    /// Aux register of the panel unique id
    pub panel_id_offset: u64,
    /// Aux register of the panel TDM bytes
    pub panel_tdm_offset: u64,
    /// Physical memory device
    pub mem: PathBuf,
    /// Physical address of the mura blob
    pub blob_offset: u64,
    /// Size of the mura blob in bytes
    pub blob_size: usize,
}

impl PlatformConfig {
    /// Configuration of the Galileo platform.
    pub fn galileo() -> Self {
        PlatformConfig {
            sys_vendor: DMI_SYS_VENDOR.into(),
            product_name: DMI_PRODUCT_NAME.into(),
            product_serial: DMI_PRODUCT_SERIAL.into(),
            expected_vendor: EXPECTED_VENDOR.into(),
            expected_product: EXPECTED_PRODUCT.into(),
            dp_aux: DP_AUX_DEVICE.into(),
            panel_id_offset: PANEL_UNIQUE_ID_BASE,
            panel_tdm_offset: PANEL_TDM,
            mem: DEV_MEM.into(),
            blob_offset: MURA_BLOB_OFFSET,
            blob_size: MURA_BLOB_SIZE,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::galileo()
    }
}
