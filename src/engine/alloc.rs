use rand::Rng;

use crate::limits::BOOKING_ID_SPACE;
use crate::model::{Booking, BookingId, BookingRequest};

use super::store::DayPartition;

/// One uniform draw from the sparse id space.
pub(crate) fn draw_candidate<R: Rng>(rng: &mut R) -> BookingId {
    rng.gen_range(1..BOOKING_ID_SPACE)
}

/// Assign a partition-unique id to `req` and insert the resulting booking.
///
/// Draw-and-probe runs as one atomic step: the caller holds the partition
/// write lock and `insert_if_absent` only commits unused ids, so two
/// concurrent allocations can never both treat the same tentative id as
/// final. The retry loop has no upper bound; that is acceptable only
/// because the id space (10^11) dwarfs any partition's population — see
/// `limits::BOOKING_ID_SPACE` for the collision arithmetic.
pub(crate) fn allocate(partition: &mut DayPartition, req: BookingRequest) -> BookingId {
    let mut rng = rand::thread_rng();
    let mut booking: Booking = req.into_booking(draw_candidate(&mut rng));
    loop {
        let id = booking.booking_id;
        if partition.insert_if_absent(booking.clone()) {
            return id;
        }
        metrics::counter!(crate::observability::ID_RETRIES_TOTAL).increment(1);
        booking.booking_id = draw_candidate(&mut rng);
    }
}
