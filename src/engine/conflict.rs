use crate::limits::MAX_SPACE_ID_LEN;
use crate::model::{BookingRequest, Space, Window};

use super::store::DayPartition;
use super::BookingError;

pub(crate) fn validate_request(req: &BookingRequest) -> Result<(), BookingError> {
    if req.space_id.is_empty() {
        return Err(BookingError::Validation("space id is required"));
    }
    if req.space_id.len() > MAX_SPACE_ID_LEN {
        return Err(BookingError::Validation("space id too long"));
    }
    if req.occupants == 0 {
        return Err(BookingError::Validation("occupants must be positive"));
    }
    if req.window.start_time >= req.window.end_time {
        return Err(BookingError::Validation("end time must be after start time"));
    }
    Ok(())
}

pub(crate) fn check_capacity(space: &Space, occupants: u32) -> Result<(), BookingError> {
    if !space.is_unlimited() && occupants > space.capacity {
        return Err(BookingError::Capacity { occupants, capacity: space.capacity });
    }
    Ok(())
}

pub(crate) fn check_hours(space: &Space, window: &Window) -> Result<(), BookingError> {
    if !window.within_hours(space.open_time, space.close_time) {
        return Err(BookingError::Hours {
            open: space.open_time,
            close: space.close_time,
        });
    }
    Ok(())
}

/// Scan the partition's current contents for a same-space booking whose
/// window overlaps the candidate's. Must run under the partition write
/// lock that the subsequent insert holds — a check against an earlier
/// snapshot would let two callers both pass and both commit.
pub(crate) fn check_no_conflict(
    partition: &DayPartition,
    space_id: &str,
    window: &Window,
) -> Result<(), BookingError> {
    for existing in partition.for_space(space_id) {
        if window.overlaps(&existing.window) {
            return Err(BookingError::Conflict(existing.booking_id));
        }
    }
    Ok(())
}
