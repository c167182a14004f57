//! Dataset measurement handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use erddap_protocol::{dataset_ids, ErddapError};

use crate::config::{
    DEFAULT_PROBE_LATITUDE, DEFAULT_PROBE_LONGITUDE, IMPLICIT_TIME_OFFSET_DAYS,
};
use crate::resolver::{ResolveRequest, ResolvedMeasurement, Source};
use crate::state::AppState;

use super::{error_response, json_response, ApiErrorBody};

/// Query parameters for the measurement endpoint.
#[derive(Debug, Deserialize)]
pub struct DatasetQueryParams {
    /// Probe latitude in degrees north.
    #[serde(rename = "latMin")]
    pub lat_min: Option<f64>,

    /// Probe longitude in degrees east.
    #[serde(rename = "lonMin")]
    pub lon_min: Option<f64>,

    /// Probe timestamp. Omitting it asks for the newest plausible data.
    pub time: Option<String>,
}

/// Success envelope for a resolved measurement.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub source: &'static str,
    pub data: MeasurementData,
    pub status: String,
}

/// Measurement payload inside the envelope.
#[derive(Debug, Serialize)]
pub struct MeasurementData {
    pub message: String,
    pub variable: &'static str,
    /// Stays null for cells upstream has no data for.
    pub valeur: Option<f64>,
    pub unite: &'static str,
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<ResolvedMeasurement> for DatasetResponse {
    fn from(resolved: ResolvedMeasurement) -> Self {
        let source = resolved.resolution.source();
        let message = match source {
            Source::Cache => "Measurement served from cache",
            Source::Upstream => "Measurement fetched from upstream",
        };

        Self {
            source: source.as_str(),
            status: resolved.resolution.status_label(),
            data: MeasurementData {
                message: message.to_string(),
                variable: resolved.variable,
                valeur: resolved.value,
                unite: resolved.unit,
                date: resolved.date,
                latitude: resolved.latitude,
                longitude: resolved.longitude,
            },
        }
    }
}

/// GET /datasets/:dataset_id
pub async fn dataset_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(dataset_id): Path<String>,
    Query(params): Query<DatasetQueryParams>,
) -> Response {
    let latitude = params.lat_min.unwrap_or(DEFAULT_PROBE_LATITUDE);
    let longitude = params.lon_min.unwrap_or(DEFAULT_PROBE_LONGITUDE);

    let (time, time_was_explicit) = match &params.time {
        Some(raw) => match parse_time_param(raw) {
            Some(time) => (time, true),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &ApiErrorBody {
                        error: "Invalid time parameter".to_string(),
                        details: Some(format!(
                            "could not parse '{}' as an ISO-8601 timestamp",
                            raw
                        )),
                        ..Default::default()
                    },
                );
            }
        },
        None => (
            (state.reference_time)() - Duration::days(IMPLICIT_TIME_OFFSET_DAYS),
            false,
        ),
    };

    let request = ResolveRequest {
        dataset_id,
        latitude,
        longitude,
        time,
        time_was_explicit,
    };

    match state.resolver.resolve(&request).await {
        Ok(resolved) => json_response(StatusCode::OK, &DatasetResponse::from(resolved)),
        Err(e) => resolution_error(e),
    }
}

/// Accepts RFC 3339, a naive timestamp, or a bare date at midnight UTC.
fn parse_time_param(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

fn resolution_error(err: ErddapError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        ErddapError::UnsupportedDataset(id) => ApiErrorBody {
            error: format!("Unknown dataset '{}'", id),
            details: Some(format!("supported datasets: {}", dataset_ids().join(", "))),
            ..Default::default()
        },
        ErddapError::UpstreamStatus { status, query } => ApiErrorBody {
            error: "Upstream request failed".to_string(),
            details: Some(format!("NOAA ERDDAP returned HTTP {}", status)),
            status: Some(status),
            erddap_query: Some(query),
        },
        ErddapError::Transport { message, query } => ApiErrorBody {
            error: "Upstream request failed".to_string(),
            details: Some(message),
            erddap_query: Some(query),
            ..Default::default()
        },
        ErddapError::InvalidBody(message) => ApiErrorBody {
            error: "Upstream response could not be parsed".to_string(),
            details: Some(message),
            ..Default::default()
        },
    };

    error_response(status, &body)
}
