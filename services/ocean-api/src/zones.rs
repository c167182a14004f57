//! Maritime zone catalog.
//!
//! A fixed set of named coastal zones with their bounding boxes, used by
//! the zone listing and the statistics endpoints.

use serde::Serialize;

/// The zones the API knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaritimeZone {
    AtlantiqueNord,
    Mediterranee,
    Manche,
    GolfeGascogne,
}

/// Every zone, in listing order.
pub const ALL_ZONES: [MaritimeZone; 4] = [
    MaritimeZone::AtlantiqueNord,
    MaritimeZone::Mediterranee,
    MaritimeZone::Manche,
    MaritimeZone::GolfeGascogne,
];

/// A zone's bounding box with the wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneBbox {
    #[serde(rename = "latMin")]
    pub lat_min: f64,
    #[serde(rename = "latMax")]
    pub lat_max: f64,
    #[serde(rename = "lonMin")]
    pub lon_min: f64,
    #[serde(rename = "lonMax")]
    pub lon_max: f64,
}

impl MaritimeZone {
    /// Look a zone up by its URL slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "atlantique-nord" => Some(MaritimeZone::AtlantiqueNord),
            "mediterranee" => Some(MaritimeZone::Mediterranee),
            "manche" => Some(MaritimeZone::Manche),
            "golfe-gascogne" => Some(MaritimeZone::GolfeGascogne),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            MaritimeZone::AtlantiqueNord => "atlantique-nord",
            MaritimeZone::Mediterranee => "mediterranee",
            MaritimeZone::Manche => "manche",
            MaritimeZone::GolfeGascogne => "golfe-gascogne",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MaritimeZone::AtlantiqueNord => "Atlantique Nord",
            MaritimeZone::Mediterranee => "Méditerranée",
            MaritimeZone::Manche => "Manche",
            MaritimeZone::GolfeGascogne => "Golfe de Gascogne",
        }
    }

    pub fn bbox(&self) -> ZoneBbox {
        let (lat_min, lat_max, lon_min, lon_max) = match self {
            MaritimeZone::AtlantiqueNord => (40.0, 50.0, -20.0, -5.0),
            MaritimeZone::Mediterranee => (36.0, 44.0, 3.0, 10.0),
            MaritimeZone::Manche => (49.0, 51.0, -5.0, 2.0),
            MaritimeZone::GolfeGascogne => (44.0, 48.0, -5.0, -1.0),
        };
        ZoneBbox {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }
}
