/// One kibibyte
pub const KB: usize = 1 << 10;
/// One mebibyte
pub const MB: usize = 1 << 20;

/// Size of the mura calibration blob (2 MiB)
pub const MURA_BLOB_SIZE: usize = 2 * MB;
/// Physical address of the mura blob inside the mapped BIOS region
pub const MURA_BLOB_OFFSET: u64 = 0xFFAA_0000;

/// DP aux register holding the panel unique id
pub const PANEL_UNIQUE_ID_BASE: u64 = 0x0360;
/// Number of panel unique id bytes read from the aux channel
pub const PANEL_UNIQUE_ID_LEN: usize = 12;
/// DP aux register holding the panel TDM bytes
pub const PANEL_TDM: u64 = 0x0370;
/// Number of TDM bytes
pub const PANEL_TDM_LEN: usize = 2;

/// DMI vendor string
pub const DMI_SYS_VENDOR: &str = "/sys/devices/virtual/dmi/id/sys_vendor";
/// DMI product string
pub const DMI_PRODUCT_NAME: &str = "/sys/devices/virtual/dmi/id/product_name";
/// DMI product serial
pub const DMI_PRODUCT_SERIAL: &str = "/sys/devices/virtual/dmi/id/product_serial";
/// DP aux character device of the internal panel
pub const DP_AUX_DEVICE: &str = "/dev/drm_dp_aux0";
/// Physical memory device
pub const DEV_MEM: &str = "/dev/mem";

/// Expected DMI vendor, including the newline sysfs appends
pub const EXPECTED_VENDOR: &str = "Valve\n";
/// Expected DMI product, including the newline sysfs appends
pub const EXPECTED_PRODUCT: &str = "Galileo\n";

/// Output location of the privileged extractor.
///
/// Fixed on purpose: the extractor runs setuid root and must not write to a
/// caller-chosen path.
pub const MURA_BLOB_PATH: &str = "/tmp/mura/blob.tar";

/// Panel serial prefix identifying BOE panels
pub const BOE_SERIAL_PREFIX: &[u8; 3] = b"SED";
/// Length of an SDC panel serial
pub const SDC_SERIAL_LEN: usize = 5;
/// TDM value of BOE panels with two gamma calibration points
pub const BOE_TDM_TWO_POINT: [u8; 2] = [0xDA, 0x14];
/// TDM value of SDC panels with two gamma calibration points
pub const SDC_TDM_TWO_POINT: [u8; 2] = [0x04, 0x75];
