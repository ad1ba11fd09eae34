//! Operating-system classification.
//!
//! Each supported OS family has its own version grammar. [`parse_version`]
//! tries the grammars in a fixed order and returns the first that matches.

mod family;
mod install_mode;
mod version;

pub use family::OsFamily;
pub use install_mode::InstallMode;
pub use version::{IosXeVersion, NxosVersion, OsVersion, parse_version};
