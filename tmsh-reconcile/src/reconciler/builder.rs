//! Builder for SSH-backed reconcilers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::Reconciler;
use crate::error::{ConfigError, Result};
use crate::resource::{Dialect, KindRegistry, ResourceKind};
use crate::session::SshConnector;
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for a [`Reconciler`] talking to one appliance over SSH.
///
/// # Example
///
/// ```rust,no_run
/// use tmsh_reconcile::{DesiredConfig, ReconcilerBuilder};
///
/// # async fn example() -> Result<(), tmsh_reconcile::Error> {
/// let reconciler = ReconcilerBuilder::new("192.0.2.10")
///     .username("admin")
///     .password("secret")
///     .kind("tcp")
///     .build()?;
///
/// let desired = DesiredConfig::new()
///     .with("name", "tcp_app")
///     .with("partition", "Common")
///     .with("idle-timeout", 300);
/// let outcome = reconciler.reconcile(&desired).await?;
/// println!("{}", outcome.message());
/// # Ok(())
/// # }
/// ```
pub struct ReconcilerBuilder {
    config: SshConfig,
    username: Option<String>,
    kind_name: Option<String>,
    custom_kind: Option<ResourceKind>,
    dialect: Dialect,
}

impl ReconcilerBuilder {
    /// Create a builder for the specified appliance.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: SshConfig::new(host),
            username: None,
            kind_name: None,
            custom_kind: None,
            dialect: Dialect::default(),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.config.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.config.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Use a registered resource kind (e.g. "tcp", "virtual-server").
    pub fn kind(mut self, name: impl Into<String>) -> Self {
        self.kind_name = Some(name.into());
        self
    }

    /// Use a resource kind that is not in the registry.
    pub fn custom_kind(mut self, kind: ResourceKind) -> Self {
        self.custom_kind = Some(kind);
        self
    }

    /// Override the command dialect (default: tmsh).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the connection timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the wait after each sent line (default: 500ms).
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set the quiet period that ends a reply drain (default: 50ms).
    pub fn drain_window(mut self, window: Duration) -> Self {
        self.config.drain_window = window;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.config.terminal_width = width;
        self.config.terminal_height = height;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.config.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.known_hosts_path = Some(path.into());
        self
    }

    /// Build the reconciler. Does not connect.
    pub fn build(self) -> Result<Reconciler<SshConnector>> {
        let username = self.username.ok_or_else(|| ConfigError::Invalid {
            message: "Username is required".to_string(),
        })?;

        let kind = match (self.custom_kind, self.kind_name) {
            (Some(custom), _) => custom,
            (None, Some(name)) => KindRegistry::lookup(&name)?,
            (None, None) => {
                return Err(ConfigError::Invalid {
                    message: "Resource kind must be specified".to_string(),
                }
                .into());
            }
        };

        let config = SshConfig {
            username,
            ..self.config
        };

        Ok(Reconciler::new(SshConnector::new(config), kind).with_dialect(self.dialect))
    }
}
