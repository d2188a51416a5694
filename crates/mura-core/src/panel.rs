//! Panel identification over the DisplayPort aux channel.
//!
//! The Galileo ships with panels from two manufacturers. Both expose a unique
//! id at [`PANEL_UNIQUE_ID_BASE`](crate::util::PANEL_UNIQUE_ID_BASE) but encode
//! it differently:
//!
//! - BOE serials are 12 ASCII characters starting with `SED`. The fourth
//!   character encodes the finish (`S` for anti-glare).
//! - SDC serials are 5 raw bytes, shown as hex. The rest of the window is zero.
//!
//! The TDM register ([`Tdm`]) additionally tells how many gamma calibration
//! points the panel was calibrated with. Reading it is only compiled in with
//! the `tdm` feature.

use std::fmt::{Display, Formatter};

use log::info;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::buffer::{ReadLen, read_file};
use crate::config::PlatformConfig;
use crate::error::{MuraError, Result};
use crate::util::{
    BOE_SERIAL_PREFIX, BOE_TDM_TWO_POINT, PANEL_TDM_LEN, PANEL_UNIQUE_ID_LEN,
    SDC_SERIAL_LEN, SDC_TDM_TWO_POINT, hex_upper,
};

/// Panel manufacturer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PanelFamily {
    /// BOE
    #[serde(rename = "BOE")]
    Boe,
    /// Samsung Display
    #[serde(rename = "SDC")]
    Sdc,
}

impl Display for PanelFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelFamily::Boe => f.write_str("BOE"),
            PanelFamily::Sdc => f.write_str("SDC"),
        }
    }
}

/// Surface finish of the panel, as far as the serial tells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelFinish {
    /// Etched, matte glass
    AntiGlare,
    /// Glossy glass
    Glossy,
    /// Not encoded in the serial
    Unknown,
}

impl PanelFinish {
    /// Answer to "Anti-glare?" as printed in the report.
    pub fn anti_glare(&self) -> &'static str {
        match self {
            PanelFinish::AntiGlare => "Yes",
            PanelFinish::Glossy => "No",
            PanelFinish::Unknown => "Unknown",
        }
    }
}

/// Classification of the internal panel derived from its unique id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelIdentity {
    /// Manufacturer
    pub family: PanelFamily,
    /// Surface finish
    pub finish: PanelFinish,
    /// Unique id bytes as read from the aux channel
    pub raw: [u8; PANEL_UNIQUE_ID_LEN],
}

impl PanelIdentity {
    /// Reads the unique id from the DP aux device and classifies the panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the aux device cannot be read or yields fewer than
    /// [`PANEL_UNIQUE_ID_LEN`] bytes.
    pub fn probe(config: &PlatformConfig) -> Result<Self> {
        let raw = read_window::<PANEL_UNIQUE_ID_LEN>(config, config.panel_id_offset)?;
        let panel = Self::classify(raw);
        info!(
            "Panel: {} (anti-glare: {}), serial {}",
            panel.family,
            panel.finish.anti_glare(),
            panel.serial()
        );
        Ok(panel)
    }

    /// Classifies a panel from its unique id bytes.
    pub fn classify(raw: [u8; PANEL_UNIQUE_ID_LEN]) -> Self {
        // An SDC id can start with "SED" too, but never has data past its
        // fifth byte.
        let is_boe =
            raw.starts_with(BOE_SERIAL_PREFIX) && raw[SDC_SERIAL_LEN..].iter().any(|&b| b != 0);
        if is_boe {
            let finish = if raw[3] == b'S' {
                PanelFinish::AntiGlare
            } else {
                PanelFinish::Glossy
            };
            PanelIdentity {
                family: PanelFamily::Boe,
                finish,
                raw,
            }
        } else {
            PanelIdentity {
                family: PanelFamily::Sdc,
                finish: PanelFinish::Unknown,
                raw,
            }
        }
    }

    /// The panel serial in its manufacturer's notation.
    ///
    /// BOE serials are ASCII up to the first NUL, SDC serials are the first
    /// five bytes in uppercase hex.
    pub fn serial(&self) -> String {
        match self.family {
            PanelFamily::Boe => {
                let end = self.raw.iter().position(|&b| b == 0).unwrap_or(self.raw.len());
                String::from_utf8_lossy(&self.raw[..end]).into_owned()
            }
            PanelFamily::Sdc => hex_upper(&self.raw[..SDC_SERIAL_LEN]),
        }
    }
}

impl Serialize for PanelIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PanelIdentity", 3)?;
        state.serialize_field("family", &self.family)?;
        state.serialize_field("finish", &self.finish)?;
        state.serialize_field("serial", &self.serial())?;
        state.end()
    }
}

/// Raw TDM register of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tdm(pub [u8; PANEL_TDM_LEN]);

impl Tdm {
    /// Reads the TDM bytes from the DP aux device.
    ///
    /// # Errors
    ///
    /// Returns an error if the aux device cannot be read or yields fewer than
    /// [`PANEL_TDM_LEN`] bytes.
    pub fn probe(config: &PlatformConfig) -> Result<Self> {
        let tdm = Tdm(read_window::<PANEL_TDM_LEN>(config, config.panel_tdm_offset)?);
        info!("TDM: {}", tdm);
        Ok(tdm)
    }

    /// Number of gamma calibration points the panel was calibrated with.
    ///
    /// Each manufacturer marks two-point calibration with its own TDM value;
    /// everything else is single-point.
    pub fn gamma_calibration_points(&self, family: PanelFamily) -> u8 {
        let two_point = match family {
            PanelFamily::Boe => BOE_TDM_TWO_POINT,
            PanelFamily::Sdc => SDC_TDM_TWO_POINT,
        };
        if self.0 == two_point { 2 } else { 1 }
    }
}

impl Display for Tdm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex_upper(&self.0))
    }
}

impl Serialize for Tdm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Reads exactly `N` bytes at `offset` from the DP aux device.
fn read_window<const N: usize>(config: &PlatformConfig, offset: u64) -> Result<[u8; N]> {
    let buf = read_file(&config.dp_aux, offset, ReadLen::Exact(N))?;
    let len = buf.len();
    buf.into_vec()
        .try_into()
        .map_err(|_| MuraError::ShortRead {
            path: config.dp_aux.clone(),
            expected: N,
            actual: len,
        })
}
