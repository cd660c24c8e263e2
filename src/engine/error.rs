use chrono::NaiveTime;

use crate::model::BookingId;

/// Everything a reservation can fail with. Each variant carries a stable
/// code (for the transport layer to map onto status signaling) and a
/// human-readable message via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Missing or expired session, or a non-admin attempting an admin op.
    Auth(String),
    /// Acting user is not the booking's owner.
    Ownership,
    /// Malformed request: bad date, inverted window, zero occupants.
    Validation(&'static str),
    /// Occupants exceed the space's capacity ceiling.
    Capacity { occupants: u32, capacity: u32 },
    /// Requested window falls outside the space's open hours.
    Hours { open: NaiveTime, close: NaiveTime },
    /// Time overlap with an existing booking for the same space and date.
    Conflict(BookingId),
    /// Unknown space, booking, or date partition.
    NotFound(&'static str),
    /// Session Validator or Space Directory unreachable, errored, or
    /// timed out. The caller may retry with backoff.
    Dependency(String),
    /// Could not acquire partition exclusivity within the deadline, or the
    /// partition is full. Retryable.
    Busy(&'static str),
}

impl BookingError {
    /// Stable machine-readable code, independent of the message text.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::Auth(_) => "AUTH",
            BookingError::Ownership => "OWNERSHIP",
            BookingError::Validation(_) => "VALIDATION",
            BookingError::Capacity { .. } => "CAPACITY",
            BookingError::Hours { .. } => "HOURS",
            BookingError::Conflict(_) => "CONFLICT",
            BookingError::NotFound(_) => "NOT_FOUND",
            BookingError::Dependency(_) => "DEPENDENCY",
            BookingError::Busy(_) => "BUSY",
        }
    }

    /// True only for failures the caller may retry with backoff. The
    /// engine itself never retries these.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Dependency(_) | BookingError::Busy(_))
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::Auth(reason) => write!(f, "not authorized: {reason}"),
            BookingError::Ownership => {
                write!(f, "a booking can only be created or cancelled by its owner")
            }
            BookingError::Validation(msg) => write!(f, "invalid request: {msg}"),
            BookingError::Capacity { occupants, capacity } => {
                write!(f, "{occupants} occupants exceed space capacity {capacity}")
            }
            BookingError::Hours { open, close } => {
                write!(f, "requested window is outside open hours [{open}, {close})")
            }
            BookingError::Conflict(id) => {
                write!(f, "window overlaps existing booking {id}")
            }
            BookingError::NotFound(what) => write!(f, "{what} not found"),
            BookingError::Dependency(reason) => {
                write!(f, "external dependency failed: {reason}")
            }
            BookingError::Busy(what) => write!(f, "try again: {what}"),
        }
    }
}

impl std::error::Error for BookingError {}
