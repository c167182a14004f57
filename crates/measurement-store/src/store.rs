//! The measurement store abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use erddap_protocol::MeasurementKind;

use crate::cell::CellKey;
use crate::error::StoreResult;

/// A cached measurement, as returned by lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedMeasurement {
    /// The stored value. `None` records that upstream had no data at this
    /// cell, which is a hit in its own right.
    pub value: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub measured_on: NaiveDate,
}

/// One cached point with every measurement recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPoint {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub measured_on: NaiveDate,
    pub temperature: Option<f64>,
    pub salinity: Option<f64>,
}

/// Persistence contract for cached measurements.
///
/// Implementations key rows by the quantized [`CellKey`] identity, so an
/// upsert followed by an exact lookup for the same raw request coordinates
/// always hits.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Find the measurement of `kind` at exactly this cell.
    ///
    /// Returns `Ok(None)` on a miss. A recorded measurement whose value is
    /// null is a hit with `value: None`.
    async fn find_exact(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>>;

    /// Find the most recent measurement of `kind` at this cell's
    /// coordinates, regardless of date.
    async fn find_latest(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>>;

    /// Record a measurement for this cell, creating the point row if
    /// needed and overwriting any previous value of the same kind.
    ///
    /// Returns the point id the measurement was attached to.
    async fn upsert(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
        value: Option<f64>,
    ) -> StoreResult<u64>;

    /// Every cached point with its recorded measurements, newest first.
    async fn all_points(&self) -> StoreResult<Vec<StoredPoint>>;
}
