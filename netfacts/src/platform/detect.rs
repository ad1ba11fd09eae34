//! Platform detection from `show version` output.

use super::device_type::DeviceType;

const NXOS_MARKERS: &[&str] = &["Cisco Nexus Operating System", "NX-OS"];
const IOSXE_MARKERS: &[&str] = &["IOS-XE", "IOS XE"];
const IOS_MARKERS: &[&str] = &["Cisco IOS Software", "Cisco Internetwork Operating System"];

/// Guess the platform from the banner printed by `show version`.
///
/// Markers are checked from most to least specific: IOS-XE banners also
/// contain "Cisco IOS Software", so IOS-XE is checked before classic IOS.
pub fn detect_device_type(show_version: &str) -> DeviceType {
    let contains_any = |markers: &[&str]| markers.iter().any(|m| show_version.contains(m));

    if contains_any(NXOS_MARKERS) {
        DeviceType::CiscoNxos
    } else if contains_any(IOSXE_MARKERS) {
        DeviceType::CiscoXe
    } else if contains_any(IOS_MARKERS) {
        DeviceType::CiscoIos
    } else {
        DeviceType::Unknown
    }
}
