use serde::{Deserialize, Serialize};

/// `[package.metadata.md2msx]` in the firmware manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Metadata {
    pub mcu: String,
    pub pcb: Option<String>,
    pub programmer: String,
    pub baud: u32,
    pub port: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            mcu: "atmega328p".into(),
            pcb: None,
            programmer: "arduino".into(),
            baud: 115200,
            port: None,
        }
    }
}

/// Local settings from `Md2msx.toml`, which win over the manifest.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Overrides {
    pub mcu: Option<String>,
    pub pcb: Option<String>,
    pub programmer: Option<String>,
    pub baud: Option<u32>,
    pub port: Option<String>,
}

impl Metadata {
    pub fn apply(self, overrides: Overrides) -> Metadata {
        Metadata {
            mcu: overrides.mcu.unwrap_or(self.mcu),
            pcb: overrides.pcb.or(self.pcb),
            programmer: overrides.programmer.unwrap_or(self.programmer),
            baud: overrides.baud.unwrap_or(self.baud),
            port: overrides.port.or(self.port),
        }
    }
}

/// The cargo feature selecting a PCB revision, e.g. `1.3` -> `pcb-1-3`.
pub fn pcb_feature(pcb: &str) -> Option<String> {
    let mut parts = pcb.split('.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    if parts.next().is_some() || !numeric(major) || !numeric(minor) {
        return None;
    }

    Some(format!("pcb-{}-{}", major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_metadata_fills_defaults() {
        let value = serde_json::json!({ "pcb": "1.3", "baud": 57600 });
        let metadata: Metadata = serde_json::from_value(value).unwrap();

        assert_eq!(metadata.mcu, "atmega328p");
        assert_eq!(metadata.pcb.as_deref(), Some("1.3"));
        assert_eq!(metadata.baud, 57600);
        assert_eq!(metadata.port, None);
    }

    #[test]
    fn overrides_win() {
        let overrides: Overrides = toml::from_str("port = \"/dev/ttyUSB0\"\nbaud = 57600\n").unwrap();
        let metadata = Metadata { pcb: Some("1.3".into()), ..Metadata::default() }.apply(overrides);

        assert_eq!(metadata.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(metadata.baud, 57600);
        assert_eq!(metadata.pcb.as_deref(), Some("1.3"));
        assert_eq!(metadata.programmer, "arduino");
    }

    #[test]
    fn pcb_versions_map_to_features() {
        assert_eq!(pcb_feature("1.3").as_deref(), Some("pcb-1-3"));
        assert_eq!(pcb_feature("2.10").as_deref(), Some("pcb-2-10"));
        assert_eq!(pcb_feature("1"), None);
        assert_eq!(pcb_feature("1.3.1"), None);
        assert_eq!(pcb_feature("1.x"), None);
    }
}
