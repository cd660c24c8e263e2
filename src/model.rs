use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::BookingError;

/// Booking identifiers are opaque positive integers, unique within a date
/// partition. Drawn at random from `1..limits::BOOKING_ID_SPACE`.
pub type BookingId = i64;

/// Half-open time window `[start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Window {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        debug_assert!(start_time < end_time, "window start must be before end");
        Self { start_time, end_time }
    }

    /// Half-open overlap test. Touching windows (one's end equals the
    /// other's start) do not overlap — back-to-back bookings are legal.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Whether the window's time-of-day lies within `[open, close)`.
    /// Date-independent: only the clock components are compared, so a
    /// window equal to the full open span passes.
    pub fn within_hours(&self, open: NaiveTime, close: NaiveTime) -> bool {
        self.start_time.time() >= open && self.end_time.time() <= close
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// A committed reservation. Never mutated in place — a change is a
/// cancel followed by a fresh reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "bookingID")]
    pub booking_id: BookingId,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    pub date: NaiveDate,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub occupants: u32,
    #[serde(flatten)]
    pub window: Window,
}

/// Everything a booking has except the identifier, which the allocator
/// assigns at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub space_id: String,
    pub date: NaiveDate,
    pub user_id: i64,
    pub occupants: u32,
    pub window: Window,
}

impl BookingRequest {
    pub(crate) fn into_booking(self, booking_id: BookingId) -> Booking {
        Booking {
            booking_id,
            space_id: self.space_id,
            date: self.date,
            user_id: self.user_id,
            occupants: self.occupants,
            window: self.window,
        }
    }
}

/// Space metadata as served by the Space Directory. Read-only to the
/// engine; fetched as an immutable snapshot per request, never owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    #[serde(rename = "spaceID")]
    pub space_id: String,
    /// Occupant ceiling. Zero (or absent in the wire record) means unlimited.
    #[serde(default)]
    pub capacity: u32,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

impl Space {
    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }
}

/// Parse a `YYYY-MM-DD` calendar day, the partition key format used by
/// the engine's public surface.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation("date must be formatted as YYYY-MM-DD"))
}
