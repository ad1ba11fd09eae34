//! Connection lifecycle and discovery for one device.

mod builder;

pub use builder::DeviceBuilder;

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::diagnostics::DiscoveryLog;
use crate::discovery::{Discovery, DiscoveryOutcome, Stage, StrategyTable};
use crate::error::{DriverError, Result};
use crate::facts::DeviceFacts;
use crate::platform::DeviceType;
use crate::session::{CommandOutput, ExecOptions, RecordParser, Session, SshSession};
use crate::transport::SshConfig;

/// A Cisco device reached over SSH.
///
/// Holds the connection settings, the live session while connected, and
/// the facts from the most recent discovery run.
pub struct CiscoDevice {
    config: SshConfig,
    device_type: DeviceType,
    parser: Arc<dyn RecordParser>,
    log: Arc<dyn DiscoveryLog>,
    strategies: StrategyTable,
    session: Option<SshSession>,
    facts: DeviceFacts,
    connect_attempts: u32,
    last_connected_at: Option<Instant>,
    last_error: Option<String>,
}

impl CiscoDevice {
    pub(crate) fn new(
        config: SshConfig,
        device_type: DeviceType,
        parser: Arc<dyn RecordParser>,
        log: Arc<dyn DiscoveryLog>,
        strategies: StrategyTable,
    ) -> Self {
        Self {
            config,
            device_type,
            parser,
            log,
            strategies,
            session: None,
            facts: DeviceFacts::default(),
            connect_attempts: 0,
            last_connected_at: None,
            last_error: None,
        }
    }

    /// Open the SSH session.
    ///
    /// Every call counts as an attempt. A failure is logged, remembered in
    /// [`last_error`](Self::last_error) and returned.
    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        self.connect_attempts += 1;
        debug!(
            "connecting to {} (attempt {})",
            self.config.socket_addr(),
            self.connect_attempts
        );

        match SshSession::open(self.config.clone(), self.device_type, self.parser.clone()).await {
            Ok(session) => {
                self.log.info(&format!(
                    "connected to {} as {}",
                    self.config.socket_addr(),
                    session.device_type()
                ));
                self.session = Some(session);
                self.last_connected_at = Some(Instant::now());
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.log.error(&format!(
                    "connection to {} failed: {}",
                    self.config.socket_addr(),
                    e
                ));
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Close the SSH session, if any.
    ///
    /// The connection timestamp is cleared even when closing fails.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.last_connected_at = None;
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }

    /// Whether a session is open and its connection still up.
    pub fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(SshSession::is_alive)
    }

    /// Run one command, logging instead of failing.
    pub async fn run_command(&mut self, command: &str, options: ExecOptions) -> Option<CommandOutput> {
        let Some(session) = self.session.as_mut() else {
            self.log
                .error(&format!("cannot run '{}': {}", command, DriverError::NotConnected));
            return None;
        };

        match session.execute(command, options).await {
            Ok(output) => Some(output),
            Err(e) => {
                self.log.error(&format!("'{}' failed: {}", command, e));
                None
            }
        }
    }

    /// Refresh [`facts`](Self::facts) from the device.
    ///
    /// Without a session the facts are cleared and the run stops before
    /// fetching anything.
    pub async fn discover(&mut self) -> DiscoveryOutcome {
        let Some(session) = self.session.as_mut() else {
            self.facts = DeviceFacts::default();
            self.log
                .error(&format!("discovery: {}", DriverError::NotConnected));
            return DiscoveryOutcome::Stopped(Stage::VersionFetch);
        };

        Discovery::new(session, self.log.as_ref())
            .with_strategies(&self.strategies)
            .run(&mut self.facts)
            .await
    }

    /// Facts from the most recent discovery run.
    pub fn facts(&self) -> &DeviceFacts {
        &self.facts
    }

    /// The detected platform while connected, otherwise the configured one.
    pub fn device_type(&self) -> DeviceType {
        self.session
            .as_ref()
            .map_or(self.device_type, SshSession::device_type)
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Number of times [`connect`](Self::connect) tried to open a session.
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    /// When the last successful connection was made.
    pub fn last_connected_at(&self) -> Option<Instant> {
        self.last_connected_at
    }

    /// The error from the last failed connection attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::diagnostics::{CapturedLog, Level};

    fn device(log: Arc<CapturedLog>) -> CiscoDevice {
        DeviceBuilder::new("127.0.0.1")
            .port(1)
            .username("admin")
            .password("secret")
            .device_type(DeviceType::CiscoXe)
            .timeout(Duration::from_secs(2))
            .log(log)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_discover_without_session() {
        let log = Arc::new(CapturedLog::new());
        let mut device = device(log.clone());

        let outcome = device.discover().await;

        assert_eq!(outcome, DiscoveryOutcome::Stopped(Stage::VersionFetch));
        assert!(device.facts().is_empty());
        assert!(log.contains(Level::Error, "not connected"));
    }

    #[tokio::test]
    async fn test_run_command_without_session() {
        let log = Arc::new(CapturedLog::new());
        let mut device = device(log.clone());

        let output = device.run_command("show clock", ExecOptions::raw()).await;

        assert!(output.is_none());
        assert!(log.contains(Level::Error, "show clock"));
    }

    #[tokio::test]
    async fn test_failed_connect_is_recorded() {
        let log = Arc::new(CapturedLog::new());
        let mut device = device(log.clone());

        assert!(device.connect().await.is_err());
        assert!(device.connect().await.is_err());

        assert_eq!(device.connect_attempts(), 2);
        assert!(device.last_error().is_some());
        assert!(device.last_connected_at().is_none());
        assert!(!device.is_connected());
        assert_eq!(log.messages(Level::Error).len(), 2);
    }

    #[test]
    fn test_disconnect_when_idle() {
        let mut device = device(Arc::new(CapturedLog::new()));
        assert!(tokio_test::block_on(device.disconnect()).is_ok());
    }

    #[test]
    fn test_disconnect_clears_connection_time() {
        let mut device = device(Arc::new(CapturedLog::new()));
        device.last_connected_at = Some(Instant::now());

        tokio_test::block_on(device.disconnect()).unwrap();

        assert!(device.last_connected_at().is_none());
        assert!(!device.is_connected());
    }
}
