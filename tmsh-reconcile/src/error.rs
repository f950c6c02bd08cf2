//! Error types for tmsh-reconcile.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::model::Action;

/// Main error type for reconciliation calls.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Shell channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// The device reply could not be turned into a safe decision
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Invalid caller input or resource kind definition
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the error came from the session collaborator (open/run/close).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Channel(_))
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host not present in known_hosts under strict checking
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Shell channel errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open PTY channel
    #[error("Failed to open PTY channel: {0}")]
    PtyOpenFailed(russh::Error),

    /// Failed to request shell
    #[error("Failed to request shell: {0}")]
    ShellRequestFailed(russh::Error),

    /// Channel closed by the device before the script finished
    #[error("Channel closed after {sent} of {total} lines")]
    Closed { sent: usize, total: usize },

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Errors raised while turning the device reply into a decision.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The listing neither clearly confirms nor denies that the object exists.
    #[error("Ambiguous existence of {kind} '{name}': {reason}")]
    AmbiguousState {
        kind: String,
        name: String,
        reason: String,
    },

    /// The apply reply does not confirm the change. Re-query before retrying.
    #[error("{action} of '{name}' not confirmed by device: {failure}")]
    PartialApply {
        name: String,
        action: Action,
        failure: String,
        reply: Vec<String>,
    },
}

/// Invalid desired state or resource kind definition.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required desired field is absent
    #[error("Desired state is missing required field '{field}'")]
    MissingField { field: String },

    /// The desired `state` value is not one of the accepted words
    #[error("Unknown desired state '{value}' (expected present, absent, enabled or disabled)")]
    UnknownState { value: String },

    /// Field not in a closed known-field set
    #[error("Field '{field}' is not managed for resource kind '{kind}'")]
    UnknownField { kind: String, field: String },

    /// No resource kind registered under this name
    #[error("Unknown resource kind: {name}")]
    UnknownKind { name: String },

    /// Kind registered twice
    #[error("Resource kind already registered: {name}")]
    KindAlreadyRegistered { name: String },

    /// Invalid builder input
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type alias using tmsh-reconcile's Error.
pub type Result<T> = std::result::Result<T, Error>;
