mod alloc;
mod conflict;
mod error;
mod store;

pub use error::BookingError;
pub use store::{BookingStore, DayPartition, SharedPartition};

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::auth::{self, Identity};
use crate::directory::SpaceDirectory;
use crate::limits::MAX_BOOKINGS_PER_PARTITION;
use crate::model::{Booking, BookingId, BookingRequest, Space};
use crate::session::SessionValidator;

/// Deadlines and ceilings for a running engine. Nothing in the engine
/// blocks past these.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a reserve or cancel may wait for partition exclusivity
    /// before failing with a retryable Busy.
    pub lock_deadline: Duration,
    /// Per-call bound on the Session Validator and Space Directory.
    pub dependency_deadline: Duration,
    /// Soft ceiling on bookings per date partition; clamped to
    /// `limits::MAX_BOOKINGS_PER_PARTITION`.
    pub max_bookings_per_day: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_deadline: Duration::from_secs(2),
            dependency_deadline: Duration::from_secs(5),
            max_bookings_per_day: MAX_BOOKINGS_PER_PARTITION,
        }
    }
}

/// The reservation core: orchestrates the authorization gate, the space
/// snapshot fetch, and the conflict-check-and-commit critical section.
///
/// Exclusivity is scoped per date partition. External collaborators are
/// consulted strictly before any lock is taken, so a slow dependency can
/// never hold a partition hostage. Within a partition, capacity, hours,
/// conflict scan, id allocation, and insert run under one write lock —
/// releasing it between check and write would let two callers validate
/// against the same pre-write snapshot and both commit.
pub struct ReservationEngine {
    store: BookingStore,
    directory: Arc<dyn SpaceDirectory>,
    sessions: Arc<dyn SessionValidator>,
    config: EngineConfig,
}

impl ReservationEngine {
    /// `directory` must be the uncached adapter: capacity and open hours
    /// feed correctness checks here, and a TTL cache could serve stale
    /// values into them.
    pub fn new(
        directory: Arc<dyn SpaceDirectory>,
        sessions: Arc<dyn SessionValidator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store: BookingStore::new(),
            directory,
            sessions,
            config,
        }
    }

    /// Atomic reserve-or-reject. On success the booking is committed and
    /// visible to subsequent reads; on any rejection nothing was written.
    pub async fn reserve(
        &self,
        identity: &Identity,
        req: BookingRequest,
    ) -> Result<BookingId, BookingError> {
        let started = Instant::now();
        let result = self.reserve_inner(identity, req).await;
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.code(),
        };
        metrics::counter!(crate::observability::RESERVES_TOTAL, "status" => status)
            .increment(1);
        metrics::histogram!(crate::observability::RESERVE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn reserve_inner(
        &self,
        identity: &Identity,
        req: BookingRequest,
    ) -> Result<BookingId, BookingError> {
        conflict::validate_request(&req)?;
        if identity.user_id != req.user_id {
            // A user may not book on another's behalf, admin included.
            return Err(BookingError::Ownership);
        }

        // Pre-flight: session check and space snapshot, concurrently,
        // each deadline-bounded, all before any partition lock. Failure
        // anywhere fails closed.
        let ((), space) = futures::try_join!(
            auth::authorize(
                self.sessions.as_ref(),
                identity,
                false,
                self.config.dependency_deadline,
            ),
            self.fetch_space(&req.space_id),
        )?;

        let partition = self.store.partition(req.date);
        let mut guard = tokio::time::timeout(self.config.lock_deadline, partition.write_owned())
            .await
            .map_err(|_| BookingError::Busy("partition lock deadline exceeded"))?;

        // Critical section: every check below sees the partition as it
        // will be at commit time.
        if guard.len() >= self.config.max_bookings_per_day.min(MAX_BOOKINGS_PER_PARTITION) {
            warn!(date = %req.date, "date partition full");
            return Err(BookingError::Busy("date partition full"));
        }
        conflict::check_capacity(&space, req.occupants)?;
        conflict::check_hours(&space, &req.window)?;
        if let Err(e) = conflict::check_no_conflict(&guard, &req.space_id, &req.window) {
            metrics::counter!(crate::observability::CONFLICTS_TOTAL).increment(1);
            debug!(space = %req.space_id, date = %req.date, "overlap rejected: {e}");
            return Err(e);
        }

        let date = req.date;
        let space_id = req.space_id.clone();
        let booking_id = alloc::allocate(&mut guard, req);
        info!(%booking_id, space = %space_id, %date, "booking committed");
        Ok(booking_id)
    }

    /// Remove a booking under the same partition exclusivity as reserve.
    /// Absence is reported as NotFound, never silently ignored. Only the
    /// owner or an admin may cancel.
    pub async fn cancel(
        &self,
        identity: &Identity,
        date: NaiveDate,
        booking_id: BookingId,
    ) -> Result<(), BookingError> {
        let result = self.cancel_inner(identity, date, booking_id).await;
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.code(),
        };
        metrics::counter!(crate::observability::CANCELS_TOTAL, "status" => status)
            .increment(1);
        result
    }

    async fn cancel_inner(
        &self,
        identity: &Identity,
        date: NaiveDate,
        booking_id: BookingId,
    ) -> Result<(), BookingError> {
        auth::authorize(
            self.sessions.as_ref(),
            identity,
            false,
            self.config.dependency_deadline,
        )
        .await?;

        let partition = self
            .store
            .existing(date)
            .ok_or(BookingError::NotFound("date partition"))?;
        let mut guard = tokio::time::timeout(self.config.lock_deadline, partition.write_owned())
            .await
            .map_err(|_| BookingError::Busy("partition lock deadline exceeded"))?;

        let owner = guard
            .get(booking_id)
            .ok_or(BookingError::NotFound("booking"))?
            .user_id;
        if owner != identity.user_id && !identity.is_admin() {
            return Err(BookingError::Ownership);
        }

        guard.remove(booking_id);
        info!(%booking_id, %date, "booking cancelled");
        Ok(())
    }

    /// Shared-lock read. A few milliseconds of staleness under concurrent
    /// writers is fine; mutating callers re-validate under the write lock.
    pub async fn get(&self, date: NaiveDate, booking_id: BookingId) -> Option<Booking> {
        let partition = self.store.existing(date)?;
        let guard = partition.read().await;
        guard.get(booking_id).cloned()
    }

    /// All bookings for one date, unordered.
    pub async fn bookings_for_date(&self, date: NaiveDate) -> Vec<Booking> {
        match self.store.existing(date) {
            Some(partition) => partition.read().await.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Drop partitions strictly older than `cutoff`. Returns how many were
    /// removed. Retention policy lives with the caller (see `sweeper`).
    pub fn sweep_expired(&self, cutoff: NaiveDate) -> usize {
        let removed = self.store.remove_before(cutoff);
        if removed > 0 {
            metrics::counter!(crate::observability::PARTITIONS_SWEPT_TOTAL)
                .increment(removed as u64);
            info!(removed, %cutoff, "swept stale date partitions");
        }
        removed
    }

    pub fn partition_count(&self) -> usize {
        self.store.partition_count()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &BookingStore {
        &self.store
    }

    async fn fetch_space(&self, space_id: &str) -> Result<Space, BookingError> {
        tokio::time::timeout(self.config.dependency_deadline, self.directory.fetch(space_id))
            .await
            .map_err(|_| BookingError::Dependency("space directory timed out".into()))?
    }
}
