//! Platform identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Cisco platform type, named the way SSH automation tooling names them.
///
/// `AutoDetect` is only meaningful before connecting; the session replaces
/// it with the detected platform once the banner has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    CiscoIos,
    CiscoXe,
    CiscoNxos,
    #[default]
    #[serde(rename = "autodetect")]
    AutoDetect,
    Unknown,
}

impl DeviceType {
    /// All variants, in declaration order.
    pub const ALL: [DeviceType; 5] = [
        DeviceType::CiscoIos,
        DeviceType::CiscoXe,
        DeviceType::CiscoNxos,
        DeviceType::AutoDetect,
        DeviceType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::CiscoIos => "cisco_ios",
            DeviceType::CiscoXe => "cisco_xe",
            DeviceType::CiscoNxos => "cisco_nxos",
            DeviceType::AutoDetect => "autodetect",
            DeviceType::Unknown => "unknown",
        }
    }

    /// Whether this names a concrete platform a session can drive.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, DeviceType::AutoDetect | DeviceType::Unknown)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        DeviceType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or(PlatformError::UnrecognizedDeviceType { name })
    }
}
