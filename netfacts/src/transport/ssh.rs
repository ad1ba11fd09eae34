//! SSH transport built on russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::client::{self, Handle};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::channel::ShellChannel;
use crate::error::{Result, TransportError};

/// An authenticated SSH connection to one device.
pub struct SshTransport {
    session: Handle<HostKeyGuard>,
    config: SshConfig,
}

impl SshTransport {
    /// Connect, verify the host key and authenticate.
    ///
    /// The whole handshake is bounded by `config.timeout`.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let client_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let guard = HostKeyGuard::new(&config);
        let rejection = guard.rejection.clone();

        debug!("connecting to {}", config.socket_addr());
        let handshake = client::connect(client_config, (config.host.as_str(), config.port), guard);
        let mut session = match tokio::time::timeout(config.timeout, handshake).await {
            Err(_) => return Err(TransportError::Timeout(config.timeout).into()),
            Ok(Ok(session)) => session,
            Ok(Err(russh::Error::IO(source))) => {
                return Err(TransportError::ConnectionFailed {
                    host: config.host.clone(),
                    port: config.port,
                    source,
                }
                .into());
            }
            // russh only reports UnknownKey; the guard knows why.
            Ok(Err(e)) => {
                let detailed = rejection.lock().ok().and_then(|mut slot| slot.take());
                return Err(detailed.unwrap_or(TransportError::Ssh(e)).into());
            }
        };

        if !authenticate(&mut session, &config).await? {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }
        debug!("authenticated to {} as {}", config.socket_addr(), config.username);

        Ok(Self { session, config })
    }

    /// Open a PTY with an interactive shell.
    pub async fn open_shell(&self) -> Result<ShellChannel> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        let (width, height) = (self.config.terminal_width, self.config.terminal_height);
        channel
            .request_pty(true, "vt100", width, height, 0, 0, &[])
            .await
            .map_err(TransportError::Ssh)?;
        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(ShellChannel::new(channel, self.config.search_depth))
    }

    pub fn is_alive(&self) -> bool {
        !self.session.is_closed()
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Disconnect politely.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// Run the configured authentication method; `Ok(false)` means rejected.
async fn authenticate(session: &mut Handle<HostKeyGuard>, config: &SshConfig) -> Result<bool> {
    let user = config.username.as_str();
    let outcome = match &config.auth {
        AuthMethod::None => session.authenticate_none(user).await,
        AuthMethod::Password(password) => {
            session
                .authenticate_password(user, password.expose_secret())
                .await
        }
        AuthMethod::PrivateKey { path, passphrase } => {
            let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                .map_err(|e| TransportError::Key(format!("{}: {}", path.display(), e)))?;
            let rsa_hash = session
                .best_supported_rsa_hash()
                .await
                .map_err(TransportError::Ssh)?
                .flatten();
            session
                .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), rsa_hash))
                .await
        }
    };

    Ok(outcome.map_err(TransportError::Ssh)?.success())
}

/// known_hosts entry lookup for one `host:port`.
struct KnownHosts {
    host: String,
    port: u16,
    path: Option<PathBuf>,
}

impl KnownHosts {
    /// `Ok(true)` when the key is on file, `Ok(false)` when the host is not.
    fn contains(&self, key: &PublicKey) -> std::result::Result<bool, TransportError> {
        let checked = match &self.path {
            Some(path) => russh::keys::check_known_hosts_path(&self.host, self.port, key, path),
            None => russh::keys::check_known_hosts(&self.host, self.port, key),
        };

        checked.map_err(|e| match e {
            russh::keys::Error::KeyChanged { line } => TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            },
            other => TransportError::KnownHosts(other.to_string()),
        })
    }

    fn remember(&self, key: &PublicKey) -> std::result::Result<(), TransportError> {
        let learned = match &self.path {
            Some(path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        learned.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }
}

/// russh handler that applies the [`HostKeyVerification`] policy.
struct HostKeyGuard {
    policy: HostKeyVerification,
    known_hosts: KnownHosts,
    /// Why the key was refused, for [`SshTransport::connect`] to report.
    rejection: Arc<Mutex<Option<TransportError>>>,
}

impl HostKeyGuard {
    fn new(config: &SshConfig) -> Self {
        Self {
            policy: config.host_key_verification.clone(),
            known_hosts: KnownHosts {
                host: config.host.clone(),
                port: config.port,
                path: config.known_hosts_path.clone(),
            },
            rejection: Arc::new(Mutex::new(None)),
        }
    }

    fn verify(&self, key: &PublicKey) -> std::result::Result<(), TransportError> {
        if matches!(self.policy, HostKeyVerification::Disabled) {
            return Ok(());
        }

        if self.known_hosts.contains(key)? {
            return Ok(());
        }

        match self.policy {
            HostKeyVerification::AcceptNew => {
                if let Err(e) = self.known_hosts.remember(key) {
                    warn!("could not record host key: {}", e);
                }
                Ok(())
            }
            _ => Err(TransportError::HostKeyUnknown {
                host: self.known_hosts.host.clone(),
                port: self.known_hosts.port,
            }),
        }
    }
}

impl client::Handler for HostKeyGuard {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.verify(server_public_key) {
            Ok(()) => Ok(true),
            Err(e) => {
                if let Ok(mut slot) = self.rejection.lock() {
                    *slot = Some(e);
                }
                Ok(false)
            }
        }
    }
}
