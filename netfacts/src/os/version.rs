//! Family-specific version grammars.
//!
//! # Formats
//!
//! ```text
//! IOS-XE   17.3.4        MAJOR.MINOR.PATCH
//!          17.3.4a       MAJOR.MINOR.PATCH + rebuild letter
//! NX-OS    7.0(3)I7(9)   MAJOR.MINOR(MAINT) + train + (rebuild)
//!          9.3(10)       MAJOR.MINOR(MAINT)
//!          10.2(3)F      MAJOR.MINOR(MAINT) + suffix
//! ```

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::family::OsFamily;
use super::install_mode::InstallMode;
use crate::error::VersionError;

static IOSXE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{1,2})([a-z])?$").unwrap());

static NXOS_TRAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\(([0-9]+)\)(I[0-9])(?:\(([0-9]+)\))?$").unwrap()
});

static NXOS_SIMPLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\(([0-9]+)\)([A-Z])?$").unwrap());

fn number<T: FromStr>(caps: &regex::Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn letter(caps: &regex::Captures<'_>, group: usize) -> Option<char> {
    caps.get(group).and_then(|m| m.as_str().chars().next())
}

/// A parsed IOS-XE version.
#[derive(Debug, Clone, Serialize)]
pub struct IosXeVersion {
    pub raw: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub rebuild_letter: Option<char>,
    pub install_mode: InstallMode,
}

impl IosXeVersion {
    /// Parse `MAJOR.MINOR.PATCH[letter]`.
    ///
    /// Returns `None` when the string does not match or the major version is
    /// zero, which no IOS-XE release uses.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = IOSXE_PATTERN.captures(raw)?;
        let major = number(&caps, 1)?;
        if major == 0 {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            major,
            minor: number(&caps, 2)?,
            patch: number(&caps, 3)?,
            rebuild_letter: letter(&caps, 4),
            install_mode: InstallMode::Unknown,
        })
    }

    /// Classify the install mode from the boot image name.
    pub fn set_install_mode(&mut self, image: &str) {
        self.install_mode = InstallMode::from_image_name(image);
    }

    pub fn is_newer_than(&self, other: &Self) -> bool {
        self > other
    }

    fn key(&self) -> (u32, u32, u32, Option<char>) {
        (self.major, self.minor, self.patch, self.rebuild_letter)
    }
}

impl PartialEq for IosXeVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for IosXeVersion {}

impl PartialOrd for IosXeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IosXeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// A parsed NX-OS version.
///
/// NX-OS fields are unbounded in the grammar, so they are held as `u64`.
#[derive(Debug, Clone, Serialize)]
pub struct NxosVersion {
    pub raw: String,
    pub major: u64,
    pub minor: u64,
    pub maintenance: u64,
    /// Release train such as `I7`.
    pub train: Option<String>,
    /// Rebuild number inside the train, `0` when absent.
    pub rebuild: u64,
    pub suffix: Option<char>,
    pub install_mode: InstallMode,
}

impl NxosVersion {
    /// Parse the train form first, then the simple form.
    pub fn parse(raw: &str) -> Option<Self> {
        let parsed = Self::parse_train(raw).or_else(|| Self::parse_simple(raw))?;
        (parsed.major != 0).then_some(parsed)
    }

    fn parse_train(raw: &str) -> Option<Self> {
        let caps = NXOS_TRAIN_PATTERN.captures(raw)?;
        let rebuild = match caps.get(5) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self {
            raw: raw.to_string(),
            major: number(&caps, 1)?,
            minor: number(&caps, 2)?,
            maintenance: number(&caps, 3)?,
            train: caps.get(4).map(|m| m.as_str().to_string()),
            rebuild,
            suffix: None,
            install_mode: InstallMode::NotApplicable,
        })
    }

    fn parse_simple(raw: &str) -> Option<Self> {
        let caps = NXOS_SIMPLE_PATTERN.captures(raw)?;
        Some(Self {
            raw: raw.to_string(),
            major: number(&caps, 1)?,
            minor: number(&caps, 2)?,
            maintenance: number(&caps, 3)?,
            train: None,
            rebuild: 0,
            suffix: letter(&caps, 4),
            install_mode: InstallMode::NotApplicable,
        })
    }

    /// NX-OS has no install/bundle distinction; the image name is ignored.
    pub fn set_install_mode(&mut self, _image: &str) {
        self.install_mode = InstallMode::NotApplicable;
    }

    pub fn is_newer_than(&self, other: &Self) -> bool {
        self > other
    }

    fn key(&self) -> (u64, u64, u64, Option<&str>, u64, Option<char>) {
        (
            self.major,
            self.minor,
            self.maintenance,
            self.train.as_deref(),
            self.rebuild,
            self.suffix,
        )
    }
}

impl PartialEq for NxosVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NxosVersion {}

impl PartialOrd for NxosVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NxosVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// A version from any supported family.
///
/// Versions are only ordered within a family; [`PartialOrd`] yields `None`
/// across families and [`is_newer_than`](Self::is_newer_than) returns an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "family")]
pub enum OsVersion {
    #[serde(rename = "IOS-XE")]
    IosXe(IosXeVersion),
    #[serde(rename = "NX-OS")]
    Nxos(NxosVersion),
}

impl OsVersion {
    pub fn family(&self) -> OsFamily {
        match self {
            OsVersion::IosXe(_) => OsFamily::IosXe,
            OsVersion::Nxos(_) => OsFamily::NxOs,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            OsVersion::IosXe(v) => &v.raw,
            OsVersion::Nxos(v) => &v.raw,
        }
    }

    pub fn major(&self) -> u64 {
        match self {
            OsVersion::IosXe(v) => u64::from(v.major),
            OsVersion::Nxos(v) => v.major,
        }
    }

    pub fn minor(&self) -> u64 {
        match self {
            OsVersion::IosXe(v) => u64::from(v.minor),
            OsVersion::Nxos(v) => v.minor,
        }
    }

    pub fn install_mode(&self) -> InstallMode {
        match self {
            OsVersion::IosXe(v) => v.install_mode,
            OsVersion::Nxos(v) => v.install_mode,
        }
    }

    pub fn set_install_mode(&mut self, image: &str) {
        match self {
            OsVersion::IosXe(v) => v.set_install_mode(image),
            OsVersion::Nxos(v) => v.set_install_mode(image),
        }
    }

    /// Whether `self` is strictly newer than `other`.
    pub fn is_newer_than(&self, other: &OsVersion) -> Result<bool, VersionError> {
        match (self, other) {
            (OsVersion::IosXe(a), OsVersion::IosXe(b)) => Ok(a.is_newer_than(b)),
            (OsVersion::Nxos(a), OsVersion::Nxos(b)) => Ok(a.is_newer_than(b)),
            _ => Err(VersionError::FamilyMismatch {
                left: self.family(),
                right: other.family(),
            }),
        }
    }
}

impl PartialOrd for OsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (OsVersion::IosXe(a), OsVersion::IosXe(b)) => Some(a.cmp(b)),
            (OsVersion::Nxos(a), OsVersion::Nxos(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Parse a raw version string with the first grammar that accepts it.
///
/// IOS-XE is tried before NX-OS. The two grammars do not overlap (dots
/// only versus parenthesised maintenance), so the order only matters for
/// future grammars.
pub fn parse_version(raw: &str) -> Option<OsVersion> {
    IosXeVersion::parse(raw)
        .map(OsVersion::IosXe)
        .or_else(|| NxosVersion::parse(raw).map(OsVersion::Nxos))
}
