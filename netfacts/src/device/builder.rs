//! Builder for [`CiscoDevice`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use super::CiscoDevice;
use crate::diagnostics::{DiscoveryLog, LogFacade};
use crate::discovery::StrategyTable;
use crate::error::{DriverError, Result};
use crate::platform::{DeviceType, PlatformRegistry};
use crate::session::{RecordParser, TextFsmParser};
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing a [`CiscoDevice`].
///
/// # Example
///
/// ```rust,no_run
/// use netfacts::{DeviceBuilder, DeviceType};
///
/// # fn example() -> Result<(), netfacts::Error> {
/// let device = DeviceBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .device_type(DeviceType::CiscoXe)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    device_type: DeviceType,
    timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    search_depth: usize,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    log: Option<Arc<dyn DiscoveryLog>>,
    parser: Option<Arc<dyn RecordParser>>,
    strategies: Option<StrategyTable>,
}

impl DeviceBuilder {
    /// Create a builder for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            device_type: DeviceType::AutoDetect,
            timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
            search_depth: 1000,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            log: None,
            parser: None,
            strategies: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Use password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Use an unencrypted private key.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Use an encrypted private key.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the platform (default: [`DeviceType::AutoDetect`]).
    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Connection and per-command timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Bytes from the end of the output searched for the prompt.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Diagnostic sink (default: [`LogFacade`]).
    pub fn log(mut self, log: Arc<dyn DiscoveryLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Record parser (default: [`TextFsmParser::with_builtins`]).
    pub fn parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Storage strategies (default: [`StrategyTable::builtin`]).
    pub fn strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Build the device.
    ///
    /// This does not connect; call [`CiscoDevice::connect`] for that.
    pub fn build(self) -> Result<CiscoDevice> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "username is required".to_string(),
        })?;

        match self.device_type {
            DeviceType::AutoDetect => {}
            DeviceType::Unknown => {
                return Err(DriverError::InvalidConfig {
                    message: "device type 'unknown' cannot be driven".to_string(),
                }
                .into());
            }
            concrete => {
                PlatformRegistry::lookup(concrete)?;
            }
        }

        let parser = match self.parser {
            Some(parser) => parser,
            None => Arc::new(TextFsmParser::with_builtins()?),
        };

        let config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            search_depth: self.search_depth,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(CiscoDevice::new(
            config,
            self.device_type,
            parser,
            self.log.unwrap_or_else(|| Arc::new(LogFacade)),
            self.strategies.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_username_is_required() {
        let err = DeviceBuilder::new("10.0.0.1").build().err().expect("build should fail without a username");
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_unknown_device_type_is_rejected() {
        let result = DeviceBuilder::new("10.0.0.1")
            .username("admin")
            .device_type(DeviceType::Unknown)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let device = DeviceBuilder::new("10.0.0.1")
            .username("admin")
            .password("secret")
            .build()
            .unwrap();

        assert_eq!(device.config().port, 22);
        assert_eq!(device.config().timeout, Duration::from_secs(30));
        assert_eq!(device.config().socket_addr(), "10.0.0.1:22");
        assert!(matches!(device.config().auth, AuthMethod::Password(_)));
        assert_eq!(device.device_type(), DeviceType::AutoDetect);
        assert!(!device.is_connected());
    }

    #[test]
    fn test_overrides() {
        let device = DeviceBuilder::new("core-sw1")
            .port(2222)
            .username("netops")
            .private_key("/tmp/id_ed25519")
            .device_type(DeviceType::CiscoNxos)
            .timeout(Duration::from_secs(5))
            .terminal_size(200, 50)
            .host_key_verification(HostKeyVerification::Disabled)
            .build()
            .unwrap();

        let config = device.config();
        assert_eq!(config.port, 2222);
        assert_eq!(config.terminal_width, 200);
        assert!(matches!(config.auth, AuthMethod::PrivateKey { passphrase: None, .. }));
        assert!(matches!(config.host_key_verification, HostKeyVerification::Disabled));
        assert_eq!(device.device_type(), DeviceType::CiscoNxos);
    }
}
