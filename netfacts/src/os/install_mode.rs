//! IOS-XE install mode classification.

use std::fmt;

use serde::Serialize;

/// How the running image was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum InstallMode {
    /// Package-based boot (`packages.conf`).
    #[serde(rename = "INSTALL")]
    Install,
    /// Monolithic image boot (`*.bin`).
    #[serde(rename = "BUNDLE")]
    Bundle,
    /// The family uses install modes but the image name was not recognized.
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// The family has no install/bundle distinction.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl InstallMode {
    /// Classify an IOS-XE boot image filename.
    ///
    /// Matching is on the trimmed, lower-cased suffix.
    pub fn from_image_name(image: &str) -> Self {
        let image = image.trim().to_ascii_lowercase();
        if image.ends_with(".conf") {
            InstallMode::Install
        } else if image.ends_with(".bin") {
            InstallMode::Bundle
        } else {
            InstallMode::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallMode::Install => "INSTALL",
            InstallMode::Bundle => "BUNDLE",
            InstallMode::Unknown => "UNKNOWN",
            InstallMode::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_mode() {
        assert_eq!(
            InstallMode::from_image_name("cat9k_iosxe.17.03.04a.SPA.conf"),
            InstallMode::Install
        );
        assert_eq!(
            InstallMode::from_image_name("bootflash:packages.conf"),
            InstallMode::Install
        );
    }

    #[test]
    fn test_bundle_mode() {
        assert_eq!(InstallMode::from_image_name("isr4300.bin"), InstallMode::Bundle);
        assert_eq!(
            InstallMode::from_image_name("  bootflash:/ISR4300-UNIVERSALK9.17.03.04A.SPA.BIN \n"),
            InstallMode::Bundle
        );
    }

    #[test]
    fn test_unrecognized_image() {
        assert_eq!(InstallMode::from_image_name(""), InstallMode::Unknown);
        assert_eq!(InstallMode::from_image_name("packages.conf.bak"), InstallMode::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(InstallMode::NotApplicable.to_string(), "N/A");
        assert_eq!(InstallMode::Install.to_string(), "INSTALL");
    }
}
