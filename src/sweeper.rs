use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Utc};

use crate::engine::ReservationEngine;

/// Background task that periodically drops date partitions older than
/// `retention_days` before today. Past dates can no longer be booked, so
/// this only reclaims memory; how long to keep them is a deployment
/// choice.
pub async fn run_sweeper(engine: Arc<ReservationEngine>, retention_days: u64, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let today = Utc::now().date_naive();
        let cutoff = match today.checked_sub_days(Days::new(retention_days)) {
            Some(d) => d,
            None => continue,
        };
        engine.sweep_expired(cutoff);
    }
}
