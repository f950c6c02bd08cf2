//! Virtual server (`ltm virtual`).
//!
//! A listing looks like:
//!
//! ```text
//! ltm virtual vs_app {
//!     creation-time 2026-10-01:09:12:44
//!     destination 10.1.1.10%0:443
//!     enabled
//!     ip-protocol tcp
//!     pool pool_app
//!     profiles {
//!         /Common/http { context all }
//!         /Common/tcp { context all }
//!     }
//!     source-address-translation {
//!         pool none
//!         type automap
//!     }
//!     vlans-disabled
//! }
//! ```

use super::{LISTING_NOISE, UNMANAGED_FIELDS};
use crate::resource::{CompositeField, Normalization, ResourceKind, ScalarRule};

pub const KIND_NAME: &str = "virtual-server";

/// Reported by the device, refused on create.
pub const READ_ONLY_FIELDS: &[&str] = &[
    "syn-cookie-status",
    "vs-index",
    "creation-time",
    "last-modified-time",
];

/// Create the virtual server kind.
pub fn kind() -> ResourceKind {
    let profiles = CompositeField::new("profiles")
        .with_create_keyword("add")
        .with_modify_keyword("replace-all-with");
    let snat = CompositeField::new("source-address-translation")
        .with_normalization(Normalization::Pairs);

    let mut kind = ResourceKind::new(KIND_NAME, "ltm virtual")
        .with_noise_markers(LISTING_NOISE.iter().copied())
        .with_noise_fields(UNMANAGED_FIELDS.iter().copied())
        .with_noise_fields(["creation-time", "last-modified-time", "vs-index"])
        .with_composite(profiles)
        .with_composite(snat)
        .with_composite(CompositeField::new("persist"))
        .with_composite(CompositeField::new("rules"))
        .with_composite(CompositeField::new("policies"))
        .with_composite(CompositeField::new("vlans"))
        .with_boolean_pair("vlans-enabled", "vlans-disabled")
        .with_boolean_pair("enabled", "disabled")
        .with_field_rule("destination", ScalarRule::AddressPort);

    for field in READ_ONLY_FIELDS {
        kind = kind.with_read_only_field(*field);
    }
    kind
}
