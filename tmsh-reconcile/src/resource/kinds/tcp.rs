//! TCP protocol profile (`ltm profile tcp`).

use super::{LISTING_NOISE, UNMANAGED_FIELDS};
use crate::resource::ResourceKind;

pub const KIND_NAME: &str = "tcp";

/// Create the TCP profile kind.
pub fn kind() -> ResourceKind {
    ResourceKind::new(KIND_NAME, "ltm profile tcp")
        .with_noise_markers(LISTING_NOISE.iter().copied())
        .with_noise_fields(UNMANAGED_FIELDS.iter().copied())
        .with_noise_field("mptcp-debug")
}
