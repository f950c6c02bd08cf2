//! UDP protocol profile (`ltm profile udp`).

use super::{LISTING_NOISE, UNMANAGED_FIELDS};
use crate::resource::ResourceKind;

pub const KIND_NAME: &str = "udp";

/// Create the UDP profile kind.
///
/// The TTL and checksum settings are reported by every listing but are left
/// to the parent profile.
pub fn kind() -> ResourceKind {
    ResourceKind::new(KIND_NAME, "ltm profile udp")
        .with_noise_markers(LISTING_NOISE.iter().copied())
        .with_noise_fields(UNMANAGED_FIELDS.iter().copied())
        .with_noise_fields(["ip-ttl-v4", "ip-ttl-v6", "no-checksum"])
}
