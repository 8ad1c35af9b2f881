//! The availability profile: a time-indexed map from simulation instants to
//! free-resource snapshots, plus the parallel profile used by advance
//! reservations.

mod entry;
mod error;
#[allow(clippy::module_inception)]
mod profile;
mod reservation_profile;

pub use entry::ProfileEntry;
pub use error::ProfileError;
pub use profile::{Profile, TimeWindow};
pub use reservation_profile::ReservationProfile;
