//! In-memory measurement store.
//!
//! Backs tests and storage-free runs with the same lookup and upsert
//! semantics as the MySQL cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use erddap_protocol::MeasurementKind;

use crate::cell::CellKey;
use crate::error::StoreResult;
use crate::store::{CachedMeasurement, MeasurementStore, StoredPoint};

/// HashMap-backed measurement store.
pub struct MemoryStore {
    cells: RwLock<HashMap<String, CellEntry>>,
    next_id: AtomicU64,
}

#[derive(Debug, Clone)]
struct CellEntry {
    id: u64,
    key: CellKey,
    // Outer Option marks whether a measurement was recorded at all; the
    // recorded value may itself be null.
    temperature: Option<Option<f64>>,
    salinity: Option<Option<f64>>,
}

impl CellEntry {
    fn new(id: u64, key: CellKey) -> Self {
        Self {
            id,
            key,
            temperature: None,
            salinity: None,
        }
    }

    fn slot(&self, kind: MeasurementKind) -> Option<Option<f64>> {
        match kind {
            MeasurementKind::Temperature => self.temperature,
            MeasurementKind::Salinity => self.salinity,
        }
    }

    fn record(&mut self, kind: MeasurementKind, value: Option<f64>) {
        match kind {
            MeasurementKind::Temperature => self.temperature = Some(value),
            MeasurementKind::Salinity => self.salinity = Some(value),
        }
    }

    fn measurement(&self, kind: MeasurementKind) -> Option<CachedMeasurement> {
        self.slot(kind).map(|value| CachedMeasurement {
            value,
            latitude: self.key.latitude(),
            longitude: self.key.longitude(),
            measured_on: self.key.date(),
        })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn find_exact(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>> {
        let cells = self.cells.read().await;
        Ok(cells
            .get(&key.to_string())
            .and_then(|entry| entry.measurement(kind)))
    }

    async fn find_latest(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>> {
        let cells = self.cells.read().await;
        let best = cells
            .values()
            .filter(|entry| {
                entry.key.latitude() == key.latitude()
                    && entry.key.longitude() == key.longitude()
                    && entry.slot(kind).is_some()
            })
            .max_by_key(|entry| entry.key.date());
        Ok(best.and_then(|entry| entry.measurement(kind)))
    }

    async fn upsert(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
        value: Option<f64>,
    ) -> StoreResult<u64> {
        let mut cells = self.cells.write().await;
        let entry = cells.entry(key.to_string()).or_insert_with(|| {
            CellEntry::new(self.next_id.fetch_add(1, Ordering::Relaxed), *key)
        });
        entry.record(kind, value);
        Ok(entry.id)
    }

    async fn all_points(&self) -> StoreResult<Vec<StoredPoint>> {
        let cells = self.cells.read().await;
        let mut points: Vec<StoredPoint> = cells
            .values()
            .map(|entry| StoredPoint {
                id: entry.id,
                latitude: entry.key.latitude(),
                longitude: entry.key.longitude(),
                measured_on: entry.key.date(),
                temperature: entry.temperature.flatten(),
                salinity: entry.salinity.flatten(),
            })
            .collect();
        // Same ordering as the MySQL listing: newest first, then west to east
        points.sort_by(|a, b| {
            b.measured_on
                .cmp(&a.measured_on)
                .then(a.latitude.total_cmp(&b.latitude))
                .then(a.longitude.total_cmp(&b.longitude))
        });
        Ok(points)
    }
}
