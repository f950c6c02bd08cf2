//! Hash persistence profile (`ltm persistence hash`).

use super::LISTING_NOISE;
use crate::resource::ResourceKind;

pub const KIND_NAME: &str = "persistence-hash";

/// Fields managed for hash persistence. `defaults-from` is only ever sent on
/// create.
pub const KNOWN_FIELDS: &[&str] = &[
    "defaults-from",
    "description",
    "hash-algorithm",
    "hash-buffer-limit",
    "hash-end-pattern",
    "hash-length",
    "hash-offset",
    "hash-start-pattern",
    "match-across-pools",
    "match-across-services",
    "match-across-virtuals",
    "mirror",
    "override-connection-limit",
    "rule",
    "timeout",
];

/// Create the hash persistence kind.
///
/// Unlike the protocol profiles, `description` is managed here. New profiles
/// always inherit from the system `hash` profile.
pub fn kind() -> ResourceKind {
    ResourceKind::new(KIND_NAME, "ltm persistence hash")
        .with_known_fields(KNOWN_FIELDS.iter().copied())
        .with_noise_markers(LISTING_NOISE.iter().copied())
        .with_noise_fields(["defaults-from", "app-service"])
        .with_create_default("defaults-from", "hash")
}
