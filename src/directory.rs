//! Space Directory boundary: capacity and open-hours metadata, fetched as
//! an immutable snapshot per request. The engine never owns or caches it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::engine::BookingError;
use crate::model::Space;

#[async_trait]
pub trait SpaceDirectory: Send + Sync {
    async fn fetch(&self, space_id: &str) -> Result<Space, BookingError>;
}

/// Talks to the availability service over HTTP: `GET {base}/space/{spaceID}`.
pub struct HttpSpaceDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSpaceDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpaceDirectory for HttpSpaceDirectory {
    async fn fetch(&self, space_id: &str) -> Result<Space, BookingError> {
        let url = format!("{}/space/{space_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookingError::Dependency(format!("space directory: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BookingError::NotFound("space"));
        }
        if !status.is_success() {
            return Err(BookingError::Dependency(format!(
                "space directory returned {status}"
            )));
        }
        resp.json::<Space>()
            .await
            .map_err(|e| BookingError::Dependency(format!("space record unreadable: {e}")))
    }
}

/// TTL read-through cache over a directory. For space-metadata lookup
/// surfaces only: the reservation engine must be handed the uncached
/// directory so stale capacity or hours never reach a correctness check.
/// Mutating writes to a space must call `invalidate` with its id.
pub struct CachedDirectory<D> {
    inner: D,
    ttl: Duration,
    entries: DashMap<String, (Instant, Space)>,
}

impl<D: SpaceDirectory> CachedDirectory<D> {
    pub fn new(inner: D, ttl: Duration) -> Self {
        Self { inner, ttl, entries: DashMap::new() }
    }

    pub fn invalidate(&self, space_id: &str) {
        self.entries.remove(space_id);
    }
}

#[async_trait]
impl<D: SpaceDirectory> SpaceDirectory for CachedDirectory<D> {
    async fn fetch(&self, space_id: &str) -> Result<Space, BookingError> {
        if let Some(entry) = self.entries.get(space_id) {
            let (fetched_at, space) = entry.value();
            if fetched_at.elapsed() < self.ttl {
                metrics::counter!(crate::observability::DIRECTORY_CACHE_HITS_TOTAL)
                    .increment(1);
                return Ok(space.clone());
            }
        }
        metrics::counter!(crate::observability::DIRECTORY_CACHE_MISSES_TOTAL).increment(1);
        // Only successful lookups are cached; errors stay side-effect free.
        let space = self.inner.fetch(space_id).await?;
        self.entries
            .insert(space_id.to_string(), (Instant::now(), space.clone()));
        Ok(space)
    }
}
