//! Client-side TLS profile (`ltm profile client-ssl`).
//!
//! The certificate chain is listed as a nested block:
//!
//! ```text
//!     cert-key-chain {
//!         default {
//!             cert /Common/default.crt
//!             key /Common/default.key
//!         }
//!     }
//! ```

use super::{LISTING_NOISE, UNMANAGED_FIELDS};
use crate::resource::{CompositeField, Normalization, ResourceKind};

pub const KIND_NAME: &str = "client-ssl";

/// Create the client-ssl profile kind.
pub fn kind() -> ResourceKind {
    // each `cert`/`key` value stays bound to its keyword
    let cert_key_chain =
        CompositeField::new("cert-key-chain").with_normalization(Normalization::Pairs);

    ResourceKind::new(KIND_NAME, "ltm profile client-ssl")
        .with_noise_markers(LISTING_NOISE.iter().copied())
        .with_noise_fields(UNMANAGED_FIELDS.iter().copied())
        .with_composite(cert_key_chain)
}
