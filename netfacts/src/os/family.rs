//! OS family tag.

use std::fmt;

use serde::Serialize;

/// Broad OS lineage of a device.
///
/// The family decides which command syntax and output shape to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OsFamily {
    #[serde(rename = "IOS-XE")]
    IosXe,
    #[serde(rename = "NX-OS")]
    NxOs,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::IosXe => "IOS-XE",
            OsFamily::NxOs => "NX-OS",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
