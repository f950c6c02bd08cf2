//! Resource kind descriptors.
//!
//! A [`ResourceKind`] tells the generic engine how one object type is listed,
//! which lines are noise, which fields span several lines and how values
//! compare. Kinds are looked up by name in the [`KindRegistry`].

mod composite;
mod definition;
mod dialect;
pub mod kinds;
mod registry;

pub use composite::{CompositeField, Normalization, RenderPhase, Terminator};
pub use definition::{ResourceKind, ScalarRule};
pub use dialect::Dialect;
pub use registry::KindRegistry;
