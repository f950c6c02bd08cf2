//! Device session collaborator.
//!
//! The reconciler only needs three things from the device side: open a
//! session, run a script and collect the reply lines, close the session.
//! [`SshConnector`] does this over SSH; tests use an in-memory double.

use std::future::Future;

use crate::error::Result;

#[cfg(test)]
pub(crate) mod mock;
mod ssh;

pub use ssh::{SshConnector, SshSession};

/// One open conversation with the appliance.
pub trait DeviceSession: Send {
    /// Send every line of `script` and return the reply split into lines.
    fn run(&mut self, script: &[String]) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Release the session.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens device sessions.
pub trait Connector: Send + Sync {
    type Session: DeviceSession;

    fn open(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}
