//! Cache-or-fetch resolution.
//!
//! A measurement request walks a fixed sequence: registry lookup, exact
//! cache probe, a latest-at-coordinates fallback, upstream fetch, write-back.
//! The fallback only runs when the caller left the time implicit; a request
//! that pinned a time answers for that exact day or goes upstream. Write-back
//! failures degrade to an annotated success, never to an error.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use erddap_protocol::{
    format_time, lookup, DatasetDescriptor, ErddapError, GriddapQuery, MeasurementKind,
};
use measurement_store::{CachedMeasurement, CellKey, MeasurementStore};

use crate::fetch::PointFetcher;

/// Where a resolved value came from, as labeled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Upstream,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "MySQL Cache",
            Source::Upstream => "NOAA ERDDAP",
        }
    }
}

/// Outcome of the cache write on the upstream path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    Cached,
    Failed(String),
}

/// How a request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The exact cell was present in the cache.
    CacheExact,
    /// Implicit-time request answered by the newest record at the
    /// coordinates.
    CacheLatest,
    /// Fetched upstream; carries the write-back outcome.
    Fetched(WriteBack),
}

impl Resolution {
    pub fn source(&self) -> Source {
        match self {
            Resolution::CacheExact | Resolution::CacheLatest => Source::Cache,
            Resolution::Fetched(_) => Source::Upstream,
        }
    }

    /// Wire status string for the response envelope.
    pub fn status_label(&self) -> String {
        match self {
            Resolution::CacheExact => "Cache Hit (Exact Match)".to_string(),
            Resolution::CacheLatest => "Cache Hit (Latest Available)".to_string(),
            Resolution::Fetched(WriteBack::Cached) => "Cached".to_string(),
            Resolution::Fetched(WriteBack::Failed(reason)) => {
                format!("Cache write failed: {}", reason)
            }
        }
    }
}

/// One measurement request, as the HTTP layer hands it down.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub dataset_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Probe timestamp, parsed from the request or derived from the
    /// injected reference clock.
    pub time: DateTime<Utc>,
    /// Whether the caller pinned the time. Implicit times may fall back to
    /// the newest cached record at the coordinates.
    pub time_was_explicit: bool,
}

/// A fully resolved measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMeasurement {
    pub kind: MeasurementKind,
    pub variable: &'static str,
    pub unit: &'static str,
    pub value: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    /// Stored observation date for cache hits, requested timestamp for
    /// upstream fetches.
    pub date: String,
    pub resolution: Resolution,
}

/// Per-cell advisory locks.
///
/// Holding a cell's lock across lookup, fetch, and write-back serializes
/// concurrent identical requests: the second caller sees the first one's
/// write as an exact hit instead of double-fetching. Entries are dropped
/// once nobody holds or waits on them, so the registry stays bounded by
/// in-flight cells.
struct CellLocks {
    cells: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CellLocks {
    fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, key: &CellKey) -> Arc<Mutex<()>> {
        let mut cells = self.cells.lock().await;
        cells.entry(key.to_string()).or_default().clone()
    }

    async fn release(&self, key: &CellKey, lock: Arc<Mutex<()>>) {
        let mut cells = self.cells.lock().await;
        drop(lock);
        let id = key.to_string();
        if let Some(entry) = cells.get(&id) {
            // Only the registry's own reference is left, nobody is waiting
            if Arc::strong_count(entry) == 1 {
                cells.remove(&id);
            }
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.cells.lock().await.len()
    }
}

/// The resolution pipeline.
pub struct Resolver {
    store: Arc<dyn MeasurementStore>,
    fetcher: Arc<dyn PointFetcher>,
    locks: CellLocks,
}

impl Resolver {
    pub fn new(store: Arc<dyn MeasurementStore>, fetcher: Arc<dyn PointFetcher>) -> Self {
        Self {
            store,
            fetcher,
            locks: CellLocks::new(),
        }
    }

    /// Resolve one measurement request.
    ///
    /// Unknown datasets fail before any storage or network access. Upstream
    /// failures are terminal and cache nothing. Store read failures downgrade
    /// to a miss, store write failures to an annotation on the result.
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<ResolvedMeasurement, ErddapError> {
        let descriptor = lookup(&request.dataset_id)
            .ok_or_else(|| ErddapError::UnsupportedDataset(request.dataset_id.clone()))?;

        let key = CellKey::new(request.latitude, request.longitude, request.time);

        let cell_lock = self.locks.lock_for(&key).await;
        let result = {
            let _guard = cell_lock.lock().await;
            self.resolve_cell(descriptor, &key, request).await
        };
        self.locks.release(&key, cell_lock).await;
        result
    }

    async fn resolve_cell(
        &self,
        descriptor: &'static DatasetDescriptor,
        key: &CellKey,
        request: &ResolveRequest,
    ) -> Result<ResolvedMeasurement, ErddapError> {
        match self.store.find_exact(key, descriptor.kind).await {
            Ok(Some(hit)) => {
                info!(dataset = descriptor.id, cell = %key, "Exact cache hit");
                return Ok(from_cache(descriptor, hit, Resolution::CacheExact));
            }
            Ok(None) => {}
            // A failing read never fails the request, it becomes a miss
            Err(e) => {
                warn!(dataset = descriptor.id, cell = %key, error = %e, "Cache read failed, treating as miss");
            }
        }

        if !request.time_was_explicit {
            match self.store.find_latest(key, descriptor.kind).await {
                Ok(Some(hit)) => {
                    info!(
                        dataset = descriptor.id,
                        cell = %key,
                        measured_on = %hit.measured_on,
                        "Latest-available cache hit"
                    );
                    return Ok(from_cache(descriptor, hit, Resolution::CacheLatest));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(dataset = descriptor.id, cell = %key, error = %e, "Cache read failed, treating as miss");
                }
            }
        }

        let time = format_time(request.time);
        let query = GriddapQuery::new(descriptor, key.latitude(), key.longitude(), time.clone());
        let sample = self.fetcher.fetch_point(&query).await?;

        let write_back = match self.store.upsert(key, descriptor.kind, sample.value).await {
            Ok(point_id) => {
                info!(
                    dataset = descriptor.id,
                    cell = %key,
                    point_id,
                    observed_time = %sample.observed_time,
                    "Fetched and cached"
                );
                WriteBack::Cached
            }
            Err(e) => {
                warn!(
                    dataset = descriptor.id,
                    cell = %key,
                    error = %e,
                    "Write-back failed, serving the fetched value anyway"
                );
                WriteBack::Failed(e.to_string())
            }
        };

        Ok(ResolvedMeasurement {
            kind: descriptor.kind,
            variable: descriptor.variable,
            unit: descriptor.unit,
            value: sample.value,
            latitude: key.latitude(),
            longitude: key.longitude(),
            date: time,
            resolution: Resolution::Fetched(write_back),
        })
    }
}

fn from_cache(
    descriptor: &DatasetDescriptor,
    hit: CachedMeasurement,
    resolution: Resolution,
) -> ResolvedMeasurement {
    ResolvedMeasurement {
        kind: descriptor.kind,
        variable: descriptor.variable,
        unit: descriptor.unit,
        value: hit.value,
        latitude: hit.latitude,
        longitude: hit.longitude,
        date: hit.measured_on.to_string(),
        resolution,
    }
}
