//! Concurrent reservation allocation core.
//!
//! Named spaces accept time-bounded bookings subject to capacity,
//! open-hours, and no-double-booking constraints. The hard part lives in
//! [`engine::ReservationEngine`]: allocating a partition-unique booking
//! id, detecting interval overlap, and committing — as one atomic unit per
//! (date) partition, while session and space-metadata validation happen at
//! external service boundaries before any lock is held.
//!
//! Transport wiring is the host's concern; this crate exposes
//! `reserve` / `cancel` / `get` and the adapter traits they depend on.

pub mod auth;
pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod session;
pub mod sweeper;

pub use auth::Identity;
pub use engine::{BookingError, EngineConfig, ReservationEngine};
pub use model::{Booking, BookingId, BookingRequest, Space, Window};
