//! Jobs, activities, reservations, and the status state machine.

mod error;
mod status;
mod workunit;

pub use error::WorkUnitError;
pub use status::Status;
pub use workunit::{JobActivity, Reservation, WorkUnit};
