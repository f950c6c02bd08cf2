//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use russh::Channel;
use russh::client::{self, AuthResult, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::{ChannelError, Result, TransportError};

/// An authenticated SSH connection to one appliance.
pub struct SshTransport {
    handle: Handle<ApplianceHandler>,
    pty_size: (u32, u32),
}

impl SshTransport {
    /// Connect to the appliance and authenticate.
    pub async fn connect(config: &SshConfig) -> Result<Self> {
        let client_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });
        let (handler, rejection) = ApplianceHandler::new(config);

        debug!("ssh: connecting to {}", config.socket_addr());
        let connect = client::connect(client_config, (config.host.as_str(), config.port), handler);
        let mut handle = match tokio::time::timeout(config.timeout, connect).await {
            Err(_) => return Err(TransportError::Timeout(config.timeout).into()),
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => return Err(connect_error(config, &rejection, e).into()),
        };

        let result = Self::authenticate(&mut handle, config).await?;
        if !result.success() {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }
        info!("ssh: {}@{} authenticated", config.username, config.host);

        Ok(Self {
            handle,
            pty_size: (config.terminal_width, config.terminal_height),
        })
    }

    /// Open a session channel with a PTY and an interactive shell.
    pub async fn open_channel(&self) -> Result<Channel<Msg>> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        let (width, height) = self.pty_size;
        channel
            .request_pty(true, "xterm", width, height, 0, 0, &[])
            .await
            .map_err(ChannelError::PtyOpenFailed)?;
        channel
            .request_shell(true)
            .await
            .map_err(ChannelError::ShellRequestFailed)?;

        Ok(channel)
    }

    async fn authenticate(
        handle: &mut Handle<ApplianceHandler>,
        config: &SshConfig,
    ) -> Result<AuthResult> {
        let user = config.username.as_str();
        let result = match &config.auth {
            AuthMethod::None => handle.authenticate_none(user).await,
            AuthMethod::Password(password) => {
                handle
                    .authenticate_password(user, password.expose_secret())
                    .await
            }
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();
                handle
                    .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg))
                    .await
            }
        };
        Ok(result.map_err(TransportError::Ssh)?)
    }

    /// Disconnect from the appliance.
    pub async fn close(self) -> Result<()> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// Map a failed connect, preferring a recorded host key rejection.
fn connect_error(
    config: &SshConfig,
    rejection: &Mutex<Option<TransportError>>,
    error: russh::Error,
) -> TransportError {
    let recorded = rejection.lock().ok().and_then(|mut slot| slot.take());
    match (recorded, error) {
        (Some(rejected), _) => rejected,
        (None, russh::Error::IO(source)) => TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        },
        (None, other) => TransportError::Ssh(other),
    }
}

/// Where the appliance's host key is checked and learned.
struct KnownHosts {
    host: String,
    port: u16,
    path: Option<PathBuf>,
}

impl KnownHosts {
    /// `Ok(true)` if the key matches, `Ok(false)` if the host is not listed.
    fn contains(&self, key: &PublicKey) -> std::result::Result<bool, TransportError> {
        let checked = match self.path.as_deref() {
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

    fn learn(&self, key: &PublicKey) -> std::result::Result<(), TransportError> {
        let learned = match self.path.as_deref() {
            Some(path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        learned.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    /// Apply a verification mode to a presented key.
    fn verify(
        &self,
        mode: &HostKeyVerification,
        key: &PublicKey,
    ) -> std::result::Result<(), TransportError> {
        match mode {
            HostKeyVerification::Disabled => Ok(()),
            HostKeyVerification::Strict => match self.contains(key)? {
                true => Ok(()),
                false => Err(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                }),
            },
            HostKeyVerification::AcceptNew => {
                if !self.contains(key)? {
                    if let Err(e) = self.learn(key) {
                        warn!("ssh: could not record host key for {}: {}", self.host, e);
                    }
                }
                Ok(())
            }
        }
    }
}

/// russh client handler; only host key checking is customised.
struct ApplianceHandler {
    mode: HostKeyVerification,
    known_hosts: KnownHosts,
    /// Detailed rejection, surfaced by `connect` instead of russh's generic error.
    rejection: Arc<Mutex<Option<TransportError>>>,
}

impl ApplianceHandler {
    fn new(config: &SshConfig) -> (Self, Arc<Mutex<Option<TransportError>>>) {
        let rejection = Arc::new(Mutex::new(None));
        let handler = Self {
            mode: config.host_key_verification.clone(),
            known_hosts: KnownHosts {
                host: config.host.clone(),
                port: config.port,
                path: config.known_hosts_path.clone(),
            },
            rejection: rejection.clone(),
        };
        (handler, rejection)
    }
}

impl client::Handler for ApplianceHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.known_hosts.verify(&self.mode, server_public_key) {
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
