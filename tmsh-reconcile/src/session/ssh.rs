//! SSH-backed device session.

use log::{debug, warn};

use super::{Connector, DeviceSession};
use crate::channel::{ShellChannel, ShellTiming};
use crate::error::Result;
use crate::transport::{SshConfig, SshTransport};

/// Opens an SSH shell session per call.
#[derive(Debug)]
pub struct SshConnector {
    config: SshConfig,
}

impl SshConnector {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    fn timing(&self) -> ShellTiming {
        ShellTiming {
            settle_delay: self.config.settle_delay,
            drain_window: self.config.drain_window,
            drain_limit: self.config.timeout,
        }
    }
}

impl Connector for SshConnector {
    type Session = SshSession;

    async fn open(&self) -> Result<SshSession> {
        let transport = SshTransport::connect(&self.config).await?;
        let shell = match ShellChannel::open(&transport, self.timing()).await {
            Ok(shell) => shell,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    warn!("ssh: disconnect after failed shell open: {}", close_err);
                }
                return Err(e);
            }
        };
        debug!("ssh: shell open on {}", self.config.socket_addr());
        Ok(SshSession { transport, shell })
    }
}

/// An SSH connection with one interactive shell.
pub struct SshSession {
    transport: SshTransport,
    shell: ShellChannel,
}

impl DeviceSession for SshSession {
    async fn run(&mut self, script: &[String]) -> Result<Vec<String>> {
        self.shell.run(script).await
    }

    async fn close(self) -> Result<()> {
        let shell = self.shell.close().await;
        let transport = self.transport.close().await;
        if let Err(e) = &shell {
            warn!("ssh: shell close failed: {}", e);
        }
        transport
    }
}
