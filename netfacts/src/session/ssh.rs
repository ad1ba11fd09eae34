//! SSH-backed [`Session`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::response::Response;
use super::template::RecordParser;
use super::{CommandOutput, ExecOptions, Session};
use crate::channel::ShellChannel;
use crate::error::{DriverError, PlatformError, Result};
use crate::platform::{DeviceType, PlatformDefinition, PlatformRegistry, detect_device_type};
use crate::transport::{SshConfig, SshTransport};

/// Platform whose prompt is used before the real platform is known.
///
/// All built-in Cisco platforms share the same prompt shape.
const DETECTION_PLATFORM: DeviceType = DeviceType::CiscoXe;

/// Interactive SSH session to one Cisco device.
pub struct SshSession {
    transport: SshTransport,
    channel: ShellChannel,
    platform: PlatformDefinition,
    parser: Arc<dyn RecordParser>,
    timeout: Duration,
}

impl SshSession {
    /// Connect, detect the platform if asked to, and prepare the terminal.
    ///
    /// With [`DeviceType::AutoDetect`] the banner of `show version` decides
    /// the platform; a banner that matches no known platform fails with
    /// [`PlatformError::UnknownPlatform`].
    pub async fn open(
        config: SshConfig,
        device_type: DeviceType,
        parser: Arc<dyn RecordParser>,
    ) -> Result<Self> {
        let timeout = config.timeout;
        let lookup_type = if device_type == DeviceType::AutoDetect {
            DETECTION_PLATFORM
        } else {
            device_type
        };
        let platform = PlatformRegistry::lookup(lookup_type)?;

        let transport = SshTransport::connect(config).await?;
        let mut channel = transport.open_shell().await?;
        channel
            .read_until_prompt(&platform.prompt_pattern, timeout)
            .await?;

        let mut session = Self {
            transport,
            channel,
            platform,
            parser,
            timeout,
        };

        if device_type == DeviceType::AutoDetect {
            session.send_command("terminal length 0").await?;
            let banner = session.send_command("show version").await?;
            let detected = detect_device_type(&banner.result);
            info!("auto-detected platform: {}", detected);
            if !detected.is_concrete() {
                return Err(PlatformError::UnknownPlatform {
                    name: detected.to_string(),
                }
                .into());
            }
            session.platform = PlatformRegistry::lookup(detected)?;
        }

        for command in session.platform.on_open_commands.clone() {
            session.send_command(&command).await?;
        }

        Ok(session)
    }

    /// The platform this session is driving.
    pub fn device_type(&self) -> DeviceType {
        self.platform.device_type
    }

    /// Whether the SSH connection is still up.
    pub fn is_alive(&self) -> bool {
        self.transport.is_alive()
    }

    /// Set the per-command timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Send a command and wait for the prompt.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let start = Instant::now();

        self.channel.clear();
        self.channel.send_line(command).await?;
        let (data, prompt) = self
            .channel
            .read_until_prompt(&self.platform.prompt_pattern, self.timeout)
            .await?;

        let elapsed = start.elapsed();
        let raw_result = String::from_utf8_lossy(&data).to_string();
        let result = self.platform.normalize_output(&raw_result, command);
        debug!("'{}' completed in {:?} ({} bytes)", command, elapsed, result.len());

        let failure = self.platform.detect_failure(&result).map(str::to_string);
        let response = Response::new(command, result, raw_result, prompt, elapsed);
        Ok(match failure {
            Some(pattern) => response.with_failure(pattern),
            None => response,
        })
    }

    /// Close the channel and the connection.
    pub async fn close(self) -> Result<()> {
        if let Err(e) = self.channel.close().await {
            debug!("closing shell channel: {}", e);
        }
        self.transport.close().await
    }
}

impl Session for SshSession {
    async fn execute(&mut self, command: &str, options: ExecOptions) -> Result<CommandOutput> {
        let response = self.send_command(command).await?;
        into_output(response, options, self.parser.as_ref(), self.platform.device_type)
    }
}

/// Turn a finished command into what [`Session::execute`] returns.
///
/// A matched failure pattern is an error. Templated requests fall back to
/// the raw text when no template applies or the template cannot parse it.
fn into_output(
    response: Response,
    options: ExecOptions,
    parser: &dyn RecordParser,
    device_type: DeviceType,
) -> Result<CommandOutput> {
    if let Some(message) = response.failure_message {
        return Err(DriverError::CommandFailed {
            command: response.command,
            message,
        }
        .into());
    }

    if !options.templated {
        return Ok(CommandOutput::Text(response.result));
    }

    match parser.parse(device_type, &response.command, &response.result) {
        Ok(Some(records)) => Ok(CommandOutput::Structured(records)),
        Ok(None) => Ok(CommandOutput::Text(response.result)),
        Err(e) => {
            warn!("templated parsing of '{}' failed: {}", response.command, e);
            Ok(CommandOutput::Text(response.result))
        }
    }
}
