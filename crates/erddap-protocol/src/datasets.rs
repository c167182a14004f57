//! Registry of supported griddap datasets.
//!
//! The registry is a fixed, compile-time list. Requests for any dataset id
//! outside it are rejected before storage or network access happens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which measurement family a dataset feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Temperature,
    Salinity,
}

impl MeasurementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Temperature => "temperature",
            MeasurementKind::Salinity => "salinity",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One axis of a griddap query, in the order the dataset declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDimension {
    Time,
    Altitude,
    Latitude,
    Longitude,
}

/// Static description of one supported dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetDescriptor {
    /// ERDDAP dataset id, as it appears in the request path upstream.
    pub id: &'static str,
    /// Grid variable to select.
    pub variable: &'static str,
    /// Query dimensions in upstream axis order.
    pub dimensions: &'static [QueryDimension],
    /// Measurement family the values are stored under.
    pub kind: MeasurementKind,
    /// Unit reported back to API clients.
    pub unit: &'static str,
}

impl DatasetDescriptor {
    /// Whether the dataset has a vertical axis that must be pinned to the surface.
    pub fn has_altitude(&self) -> bool {
        self.dimensions.contains(&QueryDimension::Altitude)
    }
}

/// NOAA blended sea-surface temperature, daily analysis.
pub const BLENDED_SST: DatasetDescriptor = DatasetDescriptor {
    id: "noaacwBLENDEDsstDNDaily",
    variable: "analysed_sst",
    dimensions: &[
        QueryDimension::Time,
        QueryDimension::Latitude,
        QueryDimension::Longitude,
    ],
    kind: MeasurementKind::Temperature,
    unit: "degree_C",
};

/// SMOS sea-surface salinity, daily composite. Carries an altitude axis.
pub const SMOS_SSS: DatasetDescriptor = DatasetDescriptor {
    id: "noaacwSMOSsssDaily",
    variable: "sss",
    dimensions: &[
        QueryDimension::Time,
        QueryDimension::Altitude,
        QueryDimension::Latitude,
        QueryDimension::Longitude,
    ],
    kind: MeasurementKind::Salinity,
    unit: "PSU",
};

const REGISTRY: &[DatasetDescriptor] = &[BLENDED_SST, SMOS_SSS];

/// Look up a dataset id in the registry.
pub fn lookup(dataset_id: &str) -> Option<&'static DatasetDescriptor> {
    REGISTRY.iter().find(|d| d.id == dataset_id)
}

/// All supported dataset ids, for listings and error payloads.
pub fn dataset_ids() -> Vec<&'static str> {
    REGISTRY.iter().map(|d| d.id).collect()
}
