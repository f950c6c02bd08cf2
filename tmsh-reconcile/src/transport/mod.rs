//! SSH transport layer wrapping russh.
//!
//! Connection setup, authentication, host key checking and shell channel
//! creation for the appliance management port.

pub mod config;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::SshTransport;
