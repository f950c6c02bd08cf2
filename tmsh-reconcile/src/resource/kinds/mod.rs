//! Built-in resource kinds.
//!
//! Each module exposes `KIND_NAME` and a `kind()` constructor.

pub mod client_ssl;
pub mod persistence_hash;
pub mod tcp;
pub mod udp;
pub mod virtual_server;

use super::ResourceKind;

/// Line starts of banner, pager-end and structural lines found in every listing.
/// Prompts are recognised by the dialect.
pub const LISTING_NOISE: &[&str] = &["(END)", "END", "}", "Last login", "ltm", "tmos"];

/// Fields listed by the device that are never managed through reconciliation.
pub const UNMANAGED_FIELDS: &[&str] = &["description", "defaults-from", "app-service"];

/// All built-in kinds.
pub fn builtin() -> Vec<ResourceKind> {
    vec![
        tcp::kind(),
        udp::kind(),
        client_ssl::kind(),
        persistence_hash::kind(),
        virtual_server::kind(),
    ]
}
