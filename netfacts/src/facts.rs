//! Fact snapshot populated by discovery.

use serde::Serialize;

use crate::os::OsVersion;
use crate::storage::StorageInfo;

/// Everything one discovery run learned about a device.
///
/// Every field starts absent. A run assigns each field at most once and a
/// field stays absent when the stage that fills it was never reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceFacts {
    pub hostname: Option<String>,
    pub config_register: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub os: Option<OsVersion>,
    pub storage: Option<StorageInfo>,
}

impl DeviceFacts {
    /// Whether no field has been populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
