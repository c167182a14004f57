//! Measurement persistence for cached ocean data.
//!
//! Measurements are cached per cell: coordinates quantized to two decimals
//! and the observation time truncated to its UTC day. The [`MeasurementStore`]
//! trait is the contract the resolution pipeline works against; [`MySqlStore`]
//! is the production cache and [`MemoryStore`] a drop-in for tests.

pub mod cell;
pub mod error;
pub mod memory;
pub mod mysql;
pub mod store;

pub use cell::{round2, CellKey};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use store::{CachedMeasurement, MeasurementStore, StoredPoint};
