//! The generic reconciliation engine.
//!
//! Pipeline, leaf first:
//!
//! ```text
//! raw lines ─► LineFilter ─► FieldExtractor ─► diff ─► CommandBuilder ─► Script
//! ```
//!
//! Every stage is a pure function of its inputs and the [`ResourceKind`]
//! descriptor; no stage talks to the device.
//!
//! [`ResourceKind`]: crate::resource::ResourceKind

mod command;
mod diff;
mod extract;
mod filter;
pub mod normalize;

pub use command::{CommandBuilder, Script};
pub use diff::diff;
pub use extract::FieldExtractor;
pub use filter::{LineClass, LineFilter};
