//! Hard bounds the engine enforces regardless of configuration.

use crate::model::BookingId;

/// Booking ids are drawn uniformly from `1..BOOKING_ID_SPACE`. With 10^11
/// candidates and partitions bounded well below 10^5 bookings, a single
/// draw collides with probability under 10^-6; the allocator's retry loop
/// is unbounded but terminates after one draw in all but astronomically
/// rare runs.
pub const BOOKING_ID_SPACE: BookingId = 100_000_000_000;

/// Ceiling on bookings held by a single date partition. Hitting it is a
/// retryable condition, not a permanent rejection.
pub const MAX_BOOKINGS_PER_PARTITION: usize = 100_000;

/// Space identifiers are short directory keys, not payloads.
pub const MAX_SPACE_ID_LEN: usize = 128;
