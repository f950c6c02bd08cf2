//! Interactive shell channel with fixed settle timing.

use std::time::Duration;

use log::trace;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::Instant;

use super::buffer::ReplyBuffer;
use crate::error::{ChannelError, Result, TransportError};
use crate::transport::SshTransport;

/// Timing of one shell conversation.
#[derive(Debug, Clone, Copy)]
pub struct ShellTiming {
    /// Wait after each sent line before draining.
    pub settle_delay: Duration,
    /// A drain ends after this long without data.
    pub drain_window: Duration,
    /// Upper bound on a single drain.
    pub drain_limit: Duration,
}

impl Default for ShellTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            drain_window: Duration::from_millis(50),
            drain_limit: Duration::from_secs(30),
        }
    }
}

/// A PTY shell on the appliance.
///
/// Lines are sent one at a time; after each one the channel sleeps for the
/// settle delay and then collects whatever the device has printed. There is
/// no prompt detection.
pub struct ShellChannel {
    channel: Channel<Msg>,
    buffer: ReplyBuffer,
    timing: ShellTiming,
    closed: bool,
}

impl ShellChannel {
    /// Open a shell and discard the login banner.
    pub async fn open(transport: &SshTransport, timing: ShellTiming) -> Result<Self> {
        let channel = transport.open_channel().await?;
        let mut shell = Self {
            channel,
            buffer: ReplyBuffer::new(),
            timing,
            closed: false,
        };
        shell.settle().await?;
        let banner = shell.buffer.take_lines();
        trace!("shell: discarded {} banner lines", banner.len());
        Ok(shell)
    }

    /// Send each line of `script` and return everything printed in reply.
    pub async fn run(&mut self, script: &[String]) -> Result<Vec<String>> {
        let total = script.len();
        for (sent, line) in script.iter().enumerate() {
            if self.closed {
                return Err(ChannelError::Closed { sent, total }.into());
            }
            trace!("shell: send {:?}", line);
            let mut bytes = Vec::with_capacity(line.len() + 1);
            bytes.extend_from_slice(line.as_bytes());
            bytes.push(b'\n');
            self.channel
                .data(&bytes[..])
                .await
                .map_err(ChannelError::Ssh)?;
            self.settle().await?;
        }
        let lines = self.buffer.take_lines();
        trace!("shell: received {} lines", lines.len());
        Ok(lines)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the channel.
    pub async fn close(self) -> Result<()> {
        if !self.closed {
            self.channel.close().await.map_err(ChannelError::Ssh)?;
        }
        Ok(())
    }

    async fn settle(&mut self) -> Result<()> {
        tokio::time::sleep(self.timing.settle_delay).await;
        self.drain().await
    }

    /// Read until the channel has been quiet for one drain window.
    async fn drain(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.timing.drain_limit;
        loop {
            if Instant::now() >= deadline {
                return Err(TransportError::Timeout(self.timing.drain_limit).into());
            }
            match tokio::time::timeout(self.timing.drain_window, self.channel.wait()).await {
                Err(_) => return Ok(()),
                Ok(Some(ChannelMsg::Data { data })) => {
                    trace!("shell: chunk {:?}", String::from_utf8_lossy(&data));
                    self.buffer.extend(&data);
                }
                Ok(Some(ChannelMsg::ExtendedData { data, .. })) => {
                    self.buffer.extend(&data);
                }
                Ok(Some(ChannelMsg::Eof | ChannelMsg::Close)) | Ok(None) => {
                    self.closed = true;
                    return Ok(());
                }
                Ok(Some(_)) => {}
            }
        }
    }
}
