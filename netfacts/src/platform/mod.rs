//! Platform definitions for Cisco device families.
//!
//! This module defines platform identifiers, per-platform session settings
//! (prompt pattern, failure patterns, on-open commands) and detection of the
//! platform from a `show version` banner.

mod definition;
mod detect;
mod device_type;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use detect::detect_device_type;
pub use device_type::DeviceType;
pub use registry::PlatformRegistry;
