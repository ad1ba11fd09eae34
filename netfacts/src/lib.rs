//! # netfacts
//!
//! Async fact discovery for Cisco IOS-XE and NX-OS devices over SSH.
//!
//! netfacts runs `show version` and a bootflash listing on a device and
//! turns the output into a typed [`DeviceFacts`] snapshot: hostname, model,
//! serial, OS version with install mode, and boot storage capacity.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with platform auto-detection
//! - Version grammars for IOS-XE (`17.3.4a`) and NX-OS (`9.3(8)`, `7.0(3)I7(9)`)
//! - TextFSM templates for CLI output that has no structured form
//! - Fail-soft discovery: bad data is logged, never raised
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netfacts::{DeviceBuilder, DeviceType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netfacts::Error> {
//!     let mut device = DeviceBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .device_type(DeviceType::CiscoXe)
//!         .build()?;
//!
//!     device.connect().await?;
//!     let outcome = device.discover().await;
//!     println!("{:?} {:?}", outcome, device.facts());
//!
//!     device.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod channel;
pub mod device;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod facts;
pub mod os;
pub mod platform;
pub mod session;
pub mod storage;
pub mod transport;

// Re-export main types for convenience
pub use access::{PathStep, SafeAccessor};
pub use device::{CiscoDevice, DeviceBuilder};
pub use diagnostics::{CapturedLog, DiscoveryLog, LogFacade};
pub use discovery::{Discovery, DiscoveryOutcome, Stage, StorageStrategy, StrategyTable};
pub use error::{Error, Result, VersionError};
pub use facts::DeviceFacts;
pub use os::{InstallMode, IosXeVersion, NxosVersion, OsFamily, OsVersion, parse_version};
pub use platform::{DeviceType, PlatformDefinition};
pub use session::{CommandOutput, ExecOptions, Session, SshSession, TextFsmParser};
pub use storage::StorageInfo;
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
