//! Value objects exchanged by the engine stages.
//!
//! All of them are scoped to a single reconciliation call.

mod action;
mod desired;
mod observed;

pub use action::{Action, ChangeDirective};
pub use desired::{DEFAULT_PARTITION, DesiredConfig, DesiredState, FieldValue, RESERVED_FIELDS};
pub use observed::{ObservedConfig, ObservedFields, ObservedValue, ParseError};
