use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use serde::Serialize;

use crate::identity::HardwareIdentity;
use crate::panel::{PanelIdentity, Tdm};

/// Outcome of a successful extraction.
///
/// `Display` renders the human-readable summary, `Serialize` the machine
/// readable one.
#[derive(Debug, Serialize)]
pub struct ExtractionReport {
    /// RFC 3339 timestamp of the extraction
    pub date: String,
    /// Where the blob was written
    pub blob_path: PathBuf,
    /// Number of bytes written
    pub blob_size: usize,
    /// DMI identity of the machine
    pub identity: HardwareIdentity,
    /// Internal panel
    pub panel: PanelIdentity,
    /// Panel TDM, only read in diagnostic builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdm: Option<Tdm>,
}

impl ExtractionReport {
    pub(crate) fn new(
        blob_path: PathBuf,
        blob_size: usize,
        identity: HardwareIdentity,
        panel: PanelIdentity,
        tdm: Option<Tdm>,
    ) -> Self {
        Self {
            date: chrono::Local::now().to_rfc3339(),
            blob_path,
            blob_size,
            identity,
            panel,
            tdm,
        }
    }

    /// Number of gamma calibration points, if the TDM was read.
    pub fn gamma_calibration_points(&self) -> Option<u8> {
        self.tdm
            .map(|tdm| tdm.gamma_calibration_points(self.panel.family))
    }
}

impl Display for ExtractionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Success! My relief is almost palpable...")?;
        writeln!(f, "Mura Blob Path: {}", self.blob_path.display())?;
        writeln!(f, "Vendor: {}", self.identity.vendor.trim_end())?;
        writeln!(f, "Product: {}", self.identity.product.trim_end())?;
        writeln!(
            f,
            "Deck Serial: {}",
            self.identity
                .serial
                .as_deref()
                .map(str::trim_end)
                .unwrap_or("Unknown")
        )?;
        writeln!(f, "Manufacturer: {}", self.panel.family)?;
        if let (Some(tdm), Some(points)) = (self.tdm, self.gamma_calibration_points()) {
            writeln!(f, "TDM: {}", tdm)?;
            writeln!(f, "Gamma Calibration Points: {}", points)?;
        }
        writeln!(f, "Anti-glare: {}", self.panel.finish.anti_glare())?;
        write!(f, "Display Serial: {}", self.panel.serial())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tdm: Option<Tdm>) -> ExtractionReport {
        ExtractionReport::new(
            "/tmp/mura/blob.tar".into(),
            2 * 1024 * 1024,
            HardwareIdentity {
                vendor: "Valve\n".into(),
                product: "Galileo\n".into(),
                serial: Some("FVAA12345678\n".into()),
            },
            PanelIdentity::classify(*b"SEDS12345678"),
            tdm,
        )
    }

    #[test]
    fn renders_console_lines() {
        let text = report(None).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Success! My relief is almost palpable...",
                "Mura Blob Path: /tmp/mura/blob.tar",
                "Vendor: Valve",
                "Product: Galileo",
                "Deck Serial: FVAA12345678",
                "Manufacturer: BOE",
                "Anti-glare: Yes",
                "Display Serial: SEDS12345678",
            ]
        );
    }

    #[test]
    fn renders_tdm_lines() {
        let text = report(Some(Tdm([0xDA, 0x14]))).to_string();
        assert!(text.contains("\nTDM: DA14\nGamma Calibration Points: 2\n"));
    }

    #[test]
    fn missing_serial_is_unknown() {
        let mut report = report(None);
        report.identity.serial = None;
        assert!(report.to_string().contains("Deck Serial: Unknown\n"));
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(report(None)).unwrap();
        assert_eq!(json["blob_path"], "/tmp/mura/blob.tar");
        assert_eq!(json["blob_size"], 2_097_152);
        assert_eq!(json["identity"]["vendor"], "Valve\n");
        assert_eq!(json["panel"]["family"], "BOE");
        assert_eq!(json["panel"]["finish"], "anti_glare");
        assert!(json.get("tdm").is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(json["date"].as_str().unwrap()).is_ok());
    }
}
