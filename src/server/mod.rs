//! Message-dispatch shells around a scheduler (spec.md §4.4): `Server`,
//! `User`, `ReservationUser`.

mod builder;
mod error;
mod reservation_user;
mod server;
mod user;

pub use builder::ServerBuilder;
pub use error::ServerError;
pub use reservation_user::ReservationUser;
pub use server::Server;
pub use user::User;
