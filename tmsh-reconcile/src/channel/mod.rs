//! Shell channel layer.
//!
//! Sends script lines over an interactive PTY shell and accumulates the
//! appliance's reply, with terminal escape sequences removed.

mod buffer;
mod shell;

pub use buffer::ReplyBuffer;
pub use shell::{ShellChannel, ShellTiming};
