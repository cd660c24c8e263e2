use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::model::{Booking, BookingId};

pub type SharedPartition = Arc<RwLock<DayPartition>>;

/// All bookings for one calendar day. The unit of exclusivity: every
/// check-then-write sequence runs under this partition's write lock.
#[derive(Debug, Default)]
pub struct DayPartition {
    bookings: HashMap<BookingId, Booking>,
}

impl DayPartition {
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    pub fn contains(&self, id: BookingId) -> bool {
        self.bookings.contains_key(&id)
    }

    /// Insert only if the id is unused. Returns false on collision without
    /// touching the existing record. This is the single atomic
    /// probe-and-reserve primitive the allocator relies on.
    pub fn insert_if_absent(&mut self, booking: Booking) -> bool {
        match self.bookings.entry(booking.booking_id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(booking);
                true
            }
        }
    }

    pub fn remove(&mut self, id: BookingId) -> Option<Booking> {
        self.bookings.remove(&id)
    }

    /// Bookings competing with `space_id` for the overlap invariant. All
    /// bookings in the partition are candidates; only same-space ones are
    /// compared.
    pub fn for_space<'a>(&'a self, space_id: &'a str) -> impl Iterator<Item = &'a Booking> {
        self.bookings.values().filter(move |b| b.space_id == space_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

/// Date-partitioned booking table. Partitions are created lazily on first
/// booking for a date and dropped by the sweeper once the date is past.
/// Unrelated dates never share a lock.
pub struct BookingStore {
    partitions: DashMap<NaiveDate, SharedPartition>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    pub fn new() -> Self {
        Self { partitions: DashMap::new() }
    }

    /// Get the partition for `date`, creating it if this is the first
    /// booking attempt for that day.
    pub fn partition(&self, date: NaiveDate) -> SharedPartition {
        self.partitions
            .entry(date)
            .or_insert_with(|| {
                metrics::gauge!(crate::observability::PARTITIONS_ACTIVE).increment(1.0);
                Arc::new(RwLock::new(DayPartition::default()))
            })
            .value()
            .clone()
    }

    /// Get the partition for `date` without creating one. Reads and
    /// cancels use this so they can report NotFound instead of minting
    /// empty partitions.
    pub fn existing(&self, date: NaiveDate) -> Option<SharedPartition> {
        self.partitions.get(&date).map(|e| e.value().clone())
    }

    /// Drop every partition strictly older than `cutoff`. Returns how many
    /// were removed.
    pub fn remove_before(&self, cutoff: NaiveDate) -> usize {
        let stale: Vec<NaiveDate> = self
            .partitions
            .iter()
            .map(|e| *e.key())
            .filter(|d| *d < cutoff)
            .collect();
        for date in &stale {
            self.partitions.remove(date);
        }
        if !stale.is_empty() {
            metrics::gauge!(crate::observability::PARTITIONS_ACTIVE)
                .decrement(stale.len() as f64);
        }
        stale.len()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::model::Window;

    fn booking(id: BookingId, space: &str, start_h: u32, end_h: u32) -> Booking {
        Booking {
            booking_id: id,
            space_id: space.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            user_id: 1,
            occupants: 2,
            window: Window::new(
                Utc.with_ymd_and_hms(2025, 3, 14, start_h, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 3, 14, end_h, 0, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn insert_if_absent_rejects_collision() {
        let mut part = DayPartition::default();
        assert!(part.insert_if_absent(booking(7, "A-101", 9, 11)));
        // Same id, different payload: the original record must survive.
        assert!(!part.insert_if_absent(booking(7, "B-202", 12, 13)));
        assert_eq!(part.get(7).unwrap().space_id, "A-101");
        assert_eq!(part.len(), 1);
    }

    #[test]
    fn for_space_filters_other_spaces() {
        let mut part = DayPartition::default();
        part.insert_if_absent(booking(1, "A-101", 9, 11));
        part.insert_if_absent(booking(2, "B-202", 9, 11));
        part.insert_if_absent(booking(3, "A-101", 14, 15));
        let ids: Vec<BookingId> = part.for_space("A-101").map(|b| b.booking_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&1) && ids.contains(&3));
    }

    #[test]
    fn partitions_created_lazily() {
        let store = BookingStore::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert!(store.existing(date).is_none());
        assert_eq!(store.partition_count(), 0);

        let part = store.partition(date);
        assert_eq!(store.partition_count(), 1);
        // Same Arc on repeat lookups.
        assert!(Arc::ptr_eq(&part, &store.partition(date)));
        assert!(store.existing(date).is_some());
    }

    #[test]
    fn remove_before_drops_only_stale_dates() {
        let store = BookingStore::new();
        let old = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let older = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        store.partition(old);
        store.partition(older);
        store.partition(today);

        let removed = store.remove_before(today);
        assert_eq!(removed, 2);
        assert!(store.existing(old).is_none());
        assert!(store.existing(older).is_none());
        assert!(store.existing(today).is_some());
    }
}
