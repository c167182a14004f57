//! Cache cell identity.
//!
//! A measurement is cached per grid cell: latitude and longitude rounded to
//! two decimals, and the observation time truncated to its UTC day. The
//! rounding is a deliberate cache quantization against a coarser-grained
//! upstream grid, so nearby request coordinates collapse into one cell.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Collapse negative zero so rendered keys stay stable
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Identity of one cached measurement cell.
///
/// Fields are private so every key passes through the quantization in
/// [`CellKey::new`]. A key built from raw request coordinates is therefore
/// always equal to the key of the row a write for that request produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellKey {
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
}

impl CellKey {
    /// Quantize raw coordinates and a timestamp into a cell identity.
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>) -> Self {
        Self {
            latitude: round2(latitude),
            longitude: round2(longitude),
            date: time.date_naive(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}:{:.2}:{}",
            self.latitude, self.longitude, self.date
        )
    }
}
