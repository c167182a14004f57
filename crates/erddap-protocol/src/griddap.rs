//! Single-point griddap query construction.
//!
//! A griddap request selects one grid cell by appending a degenerate range
//! `[(v):1:(v)]` for every dimension the dataset declares, in declaration
//! order, after the variable name.

use chrono::{DateTime, Utc};

use crate::datasets::{DatasetDescriptor, QueryDimension};

/// Default upstream endpoint (NOAA CoastWatch ERDDAP).
pub const DEFAULT_BASE_URL: &str = "https://coastwatch.noaa.gov/erddap/griddap";

/// Timestamp layout griddap expects in range expressions.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Altitude pinned for datasets with a vertical axis (sea surface).
const SURFACE_ALTITUDE: f64 = 0.0;

/// Render a timestamp in griddap range syntax.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// A single-cell query against one registered dataset.
#[derive(Debug, Clone)]
pub struct GriddapQuery<'a> {
    descriptor: &'a DatasetDescriptor,
    latitude: f64,
    longitude: f64,
    time: String,
}

impl<'a> GriddapQuery<'a> {
    pub fn new(
        descriptor: &'a DatasetDescriptor,
        latitude: f64,
        longitude: f64,
        time: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            latitude,
            longitude,
            time: time.into(),
        }
    }

    pub fn descriptor(&self) -> &DatasetDescriptor {
        self.descriptor
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    /// The query expression after the `?`, e.g.
    /// `analysed_sst[(2024-01-10T00:00:00Z):1:(2024-01-10T00:00:00Z)][(45):1:(45)][(0):1:(0)]`.
    pub fn query_string(&self) -> String {
        let mut query = String::from(self.descriptor.variable);
        for dimension in self.descriptor.dimensions {
            match dimension {
                QueryDimension::Time => query.push_str(&range(&self.time)),
                QueryDimension::Altitude => query.push_str(&range(SURFACE_ALTITUDE)),
                QueryDimension::Latitude => query.push_str(&range(self.latitude)),
                QueryDimension::Longitude => query.push_str(&range(self.longitude)),
            }
        }
        query
    }

    /// Full request URL against `base`, selecting the JSON table output.
    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/{}.json?{}",
            base.trim_end_matches('/'),
            self.descriptor.id,
            self.query_string()
        )
    }
}

fn range(value: impl std::fmt::Display) -> String {
    format!("[({}):1:({})]", value, value)
}
