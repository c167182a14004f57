//! Tests for the ocean API wire formats.
//!
//! These tests pin the JSON shapes the endpoints serve, and walk the
//! cache-or-fetch flow through the public library types without requiring
//! a database or network access.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use erddap_protocol::{ErddapError, GriddapQuery, PointSample};
use measurement_store::{MemoryStore, StoredPoint};

use ocean_api::fetch::PointFetcher;
use ocean_api::handlers::datasets::DatasetResponse;
use ocean_api::handlers::ApiErrorBody;
use ocean_api::resolver::{ResolveRequest, Resolver};

// ============================================================================
// Measurement envelope serialization
// ============================================================================

/// Fetcher that always answers with the same value.
struct FixedFetcher(Option<f64>);

#[async_trait]
impl PointFetcher for FixedFetcher {
    async fn fetch_point(&self, query: &GriddapQuery<'_>) -> Result<PointSample, ErddapError> {
        Ok(PointSample {
            value: self.0,
            observed_time: query.time().to_string(),
        })
    }
}

fn sst_request(time_was_explicit: bool) -> ResolveRequest {
    ResolveRequest {
        dataset_id: "noaacwBLENDEDsstDNDaily".to_string(),
        latitude: 45.0,
        longitude: 0.0,
        time: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        time_was_explicit,
    }
}

#[tokio::test]
async fn test_fetch_then_cache_flow_produces_both_envelopes() {
    let resolver = Resolver::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedFetcher(Some(14.2))),
    );
    let request = sst_request(true);

    let fetched = resolver.resolve(&request).await.unwrap();
    let json = serde_json::to_string(&DatasetResponse::from(fetched)).unwrap();
    assert!(json.contains("\"source\":\"NOAA ERDDAP\""));
    assert!(json.contains("\"status\":\"Cached\""));
    assert!(json.contains("\"valeur\":14.2"));
    assert!(json.contains("\"unite\":\"degree_C\""));
    assert!(json.contains("\"date\":\"2024-01-10T00:00:00Z\""));

    let cached = resolver.resolve(&request).await.unwrap();
    let json = serde_json::to_string(&DatasetResponse::from(cached)).unwrap();
    assert!(json.contains("\"source\":\"MySQL Cache\""));
    assert!(json.contains("\"status\":\"Cache Hit (Exact Match)\""));
    // Cache hits echo the stored observation date
    assert!(json.contains("\"date\":\"2024-01-10\""));
}

#[tokio::test]
async fn test_known_empty_cells_serialize_a_null_value() {
    let resolver = Resolver::new(Arc::new(MemoryStore::new()), Arc::new(FixedFetcher(None)));

    let resolved = resolver.resolve(&sst_request(true)).await.unwrap();
    let json = serde_json::to_string(&DatasetResponse::from(resolved)).unwrap();

    assert!(json.contains("\"valeur\":null"));
}

#[tokio::test]
async fn test_envelope_carries_every_payload_field() {
    let resolver = Resolver::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedFetcher(Some(14.2))),
    );

    let resolved = resolver.resolve(&sst_request(true)).await.unwrap();
    let json = serde_json::to_value(DatasetResponse::from(resolved)).unwrap();

    let data = json["data"].as_object().unwrap();
    for field in [
        "message",
        "variable",
        "valeur",
        "unite",
        "date",
        "latitude",
        "longitude",
    ] {
        assert!(data.contains_key(field), "missing field {}", field);
    }
    assert_eq!(data["variable"], "analysed_sst");
    assert_eq!(data["latitude"], 45.0);
    assert_eq!(data["longitude"], 0.0);
}

// ============================================================================
// Error body serialization
// ============================================================================

#[test]
fn test_error_body_omits_unset_fields() {
    let body = ApiErrorBody {
        error: "Unknown dataset 'jplMURSST41'".to_string(),
        ..Default::default()
    };

    let json = serde_json::to_string(&body).unwrap();
    assert_eq!(json, "{\"error\":\"Unknown dataset 'jplMURSST41'\"}");
}

#[test]
fn test_upstream_error_body_carries_the_query() {
    let body = ApiErrorBody {
        error: "Upstream request failed".to_string(),
        details: Some("NOAA ERDDAP returned HTTP 502".to_string()),
        status: Some(502),
        erddap_query: Some(
            "analysed_sst[(2024-01-10T00:00:00Z):1:(2024-01-10T00:00:00Z)][(45):1:(45)][(0):1:(0)]"
                .to_string(),
        ),
    };

    let json = serde_json::to_string(&body).unwrap();
    assert!(json.contains("\"status\":502"));
    assert!(json.contains("\"erddap_query\":\"analysed_sst"));
}

// ============================================================================
// Point listing serialization
// ============================================================================

#[test]
fn test_stored_point_serialization() {
    let point = StoredPoint {
        id: 3,
        latitude: 45.0,
        longitude: 0.0,
        measured_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        temperature: Some(14.2),
        salinity: None,
    };

    let json = serde_json::to_string(&point).unwrap();
    assert!(json.contains("\"id\":3"));
    assert!(json.contains("\"measured_on\":\"2024-01-10\""));
    assert!(json.contains("\"temperature\":14.2"));
    assert!(json.contains("\"salinity\":null"));
}

// ============================================================================
// Zone listing serialization
// ============================================================================

#[tokio::test]
async fn test_zone_listing_shape() {
    let axum::Json(zones) = ocean_api::handlers::zones::zones_handler().await;
    let json = serde_json::to_value(&zones).unwrap();

    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 4);

    let slugs: Vec<&str> = listed
        .iter()
        .map(|zone| zone["slug"].as_str().unwrap())
        .collect();
    assert_eq!(
        slugs,
        vec!["atlantique-nord", "mediterranee", "manche", "golfe-gascogne"]
    );

    // Bounding boxes keep their wire field names
    assert_eq!(listed[0]["bbox"]["latMin"], 40.0);
    assert_eq!(listed[0]["bbox"]["lonMax"], -5.0);
    assert_eq!(listed[0]["name"], "Atlantique Nord");
}

// ============================================================================
// Statistics serialization
// ============================================================================

#[test]
fn test_stats_response_flattens_the_series() {
    use ocean_api::handlers::stats::StatsResponse;
    use ocean_api::stats::generate_series;
    use ocean_api::zones::MaritimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(5);
    let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();

    let response = StatsResponse {
        zone: MaritimeZone::Manche.display_name(),
        bbox: MaritimeZone::Manche.bbox(),
        series: generate_series(start, end, &mut rng),
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["zone"], "Manche");
    assert_eq!(json["bbox"]["latMin"], 49.0);
    // The series vectors sit at the top level, not under a "series" key
    assert!(json["series"].is_null());
    assert_eq!(json["dates"].as_array().unwrap().len(), 3);
    assert_eq!(json["temperature"].as_array().unwrap().len(), 3);
    assert_eq!(json["salinite"].as_array().unwrap().len(), 3);
    assert_eq!(json["chlorophylle"].as_array().unwrap().len(), 3);
}
