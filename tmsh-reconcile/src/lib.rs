//! # tmsh-reconcile
//!
//! Desired-state reconciliation of F5 BIG-IP objects over an SSH `tmsh` shell.
//!
//! The appliance is driven the way an operator would drive it: list the
//! object, read the human-readable listing, and type the one `create`,
//! `modify` or `delete` line that closes the gap.
//!
//! ## Features
//!
//! - One generic engine (filter, extract, diff, render) for every object type
//! - Built-in kinds: `tcp`, `udp`, `client-ssl`, `persistence-hash`,
//!   `virtual-server`; custom kinds as plain data
//! - Multi-line fields (profile lists, certificate chains, SNAT blocks)
//!   compared structurally
//! - Async SSH sessions via russh with a fixed settle delay per line
//! - Explicit errors for ambiguous listings and unconfirmed applies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tmsh_reconcile::{DesiredConfig, ReconcilerBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tmsh_reconcile::Error> {
//!     let reconciler = ReconcilerBuilder::new("192.0.2.10")
//!         .username("admin")
//!         .password("secret")
//!         .kind("tcp")
//!         .build()?;
//!
//!     let desired = DesiredConfig::new()
//!         .with("name", "tcp_app")
//!         .with("partition", "Common")
//!         .with("idle-timeout", 300);
//!
//!     let outcome = reconciler.reconcile(&desired).await?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod engine;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod resource;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use engine::Script;
pub use error::Error;
pub use model::{Action, ChangeDirective, DesiredConfig, DesiredState, FieldValue, ObservedConfig};
pub use reconciler::{Outcome, Plan, Reconciler, ReconcilerBuilder, Status};
pub use resource::{Dialect, KindRegistry, ResourceKind};
pub use session::{Connector, DeviceSession, SshConnector};
pub use transport::{AuthMethod, SshConfig};
