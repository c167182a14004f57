//! Zone statistics handler.

use axum::{extract::Query, http::StatusCode, response::Response};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::stats::{generate_series, StatsSeries};
use crate::zones::{MaritimeZone, ZoneBbox, ALL_ZONES};

use super::{error_response, json_response, ApiErrorBody};

/// Query parameters for the statistics endpoint.
#[derive(Debug, Deserialize)]
pub struct StatsQueryParams {
    /// Zone slug, see the zone listing.
    pub zone: Option<String>,

    /// First day of the series, YYYY-MM-DD.
    pub date_debut: Option<String>,

    /// Last day of the series, inclusive, YYYY-MM-DD.
    pub date_fin: Option<String>,
}

/// Statistics response: the zone, its bbox and one value series per day.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub zone: &'static str,
    pub bbox: ZoneBbox,
    #[serde(flatten)]
    pub series: StatsSeries,
}

/// GET /stats
pub async fn stats_handler(Query(params): Query<StatsQueryParams>) -> Response {
    let (zone, start, end) = match validate_params(&params) {
        Ok(validated) => validated,
        Err((status, body)) => return error_response(status, &body),
    };

    let mut rng = StdRng::from_entropy();
    let series = generate_series(start, end, &mut rng);

    json_response(
        StatusCode::OK,
        &StatsResponse {
            zone: zone.display_name(),
            bbox: zone.bbox(),
            series,
        },
    )
}

fn validate_params(
    params: &StatsQueryParams,
) -> Result<(MaritimeZone, NaiveDate, NaiveDate), (StatusCode, ApiErrorBody)> {
    let (slug, raw_start, raw_end) = match (&params.zone, &params.date_debut, &params.date_fin) {
        (Some(zone), Some(start), Some(end)) => (zone, start, end),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    error: "Missing required parameters".to_string(),
                    details: Some("zone, date_debut and date_fin are required".to_string()),
                    ..Default::default()
                },
            ));
        }
    };

    let zone = MaritimeZone::from_slug(slug).ok_or_else(|| {
        let known: Vec<&str> = ALL_ZONES.iter().map(|zone| zone.slug()).collect();
        (
            StatusCode::NOT_FOUND,
            ApiErrorBody {
                error: format!("Unknown zone '{}'", slug),
                details: Some(format!("known zones: {}", known.join(", "))),
                ..Default::default()
            },
        )
    })?;

    let start = parse_date(raw_start)?;
    let end = parse_date(raw_end)?;

    if start > end {
        return Err((
            StatusCode::BAD_REQUEST,
            ApiErrorBody {
                error: "Invalid date range".to_string(),
                details: Some("date_debut must not be after date_fin".to_string()),
                ..Default::default()
            },
        ));
    }

    Ok((zone, start, end))
}

fn parse_date(raw: &str) -> Result<NaiveDate, (StatusCode, ApiErrorBody)> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            ApiErrorBody {
                error: "Invalid date".to_string(),
                details: Some(format!("could not parse '{}' as YYYY-MM-DD", raw)),
                ..Default::default()
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(zone: Option<&str>, start: Option<&str>, end: Option<&str>) -> StatsQueryParams {
        StatsQueryParams {
            zone: zone.map(str::to_string),
            date_debut: start.map(str::to_string),
            date_fin: end.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_params_pass() {
        let (zone, start, end) =
            validate_params(&params(Some("manche"), Some("2024-01-10"), Some("2024-01-12")))
                .unwrap();

        assert_eq!(zone, MaritimeZone::Manche);
        assert_eq!(start.to_string(), "2024-01-10");
        assert_eq!(end.to_string(), "2024-01-12");
    }

    #[test]
    fn test_missing_params_are_rejected() {
        for p in [
            params(None, Some("2024-01-10"), Some("2024-01-12")),
            params(Some("manche"), None, Some("2024-01-12")),
            params(Some("manche"), Some("2024-01-10"), None),
            params(None, None, None),
        ] {
            let (status, _) = validate_params(&p).unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_unknown_zone_is_not_found() {
        let (status, body) =
            validate_params(&params(Some("mer-du-nord"), Some("2024-01-10"), Some("2024-01-12")))
                .unwrap_err();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.details.unwrap().contains("atlantique-nord"));
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        let (status, _) =
            validate_params(&params(Some("manche"), Some("10/01/2024"), Some("2024-01-12")))
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_reversed_ranges_are_rejected() {
        let (status, body) =
            validate_params(&params(Some("manche"), Some("2024-01-12"), Some("2024-01-10")))
                .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid date range");
    }

    #[tokio::test]
    async fn test_stats_handler_returns_ok() {
        let response = stats_handler(Query(params(
            Some("golfe-gascogne"),
            Some("2024-01-10"),
            Some("2024-01-12"),
        )))
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
