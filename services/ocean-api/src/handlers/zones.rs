//! Maritime zone listing handler.

use axum::Json;
use serde::Serialize;

use crate::zones::{ZoneBbox, ALL_ZONES};

/// One zone in the listing.
#[derive(Debug, Serialize)]
pub struct ZoneSummary {
    pub name: &'static str,
    pub slug: &'static str,
    pub bbox: ZoneBbox,
}

/// GET /zones - Static maritime zone catalog
pub async fn zones_handler() -> Json<Vec<ZoneSummary>> {
    Json(
        ALL_ZONES
            .iter()
            .map(|zone| ZoneSummary {
                name: zone.display_name(),
                slug: zone.slug(),
                bbox: zone.bbox(),
            })
            .collect(),
    )
}
