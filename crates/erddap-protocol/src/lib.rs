//! NOAA ERDDAP griddap protocol
//!
//! Types and utilities for talking to an ERDDAP griddap endpoint: the
//! registry of datasets this deployment supports, single-point query
//! construction, and parsing of the tabular `.json` responses.
//!
//! # Example
//!
//! ```rust
//! use erddap_protocol::{lookup, GriddapQuery, DEFAULT_BASE_URL};
//!
//! let descriptor = lookup("noaacwBLENDEDsstDNDaily").unwrap();
//! let query = GriddapQuery::new(descriptor, 45.0, 0.0, "2024-01-10T00:00:00Z");
//! let url = query.url(DEFAULT_BASE_URL);
//! assert!(url.contains("analysed_sst"));
//! ```

pub mod datasets;
pub mod errors;
pub mod griddap;
pub mod table;

// Re-export commonly used types
pub use datasets::{
    dataset_ids, lookup, DatasetDescriptor, MeasurementKind, QueryDimension, BLENDED_SST,
    SMOS_SSS,
};
pub use errors::ErddapError;
pub use griddap::{format_time, GriddapQuery, DEFAULT_BASE_URL, TIME_FORMAT};
pub use table::{GriddapResponse, GriddapTable, PointSample};
