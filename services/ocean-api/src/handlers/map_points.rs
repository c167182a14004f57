//! Cached point listing handler.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Response};
use tracing::error;

use crate::state::AppState;

use super::{error_response, json_response, ApiErrorBody};

/// GET /map-points - Every cached point with its recorded measurements
pub async fn map_points_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.store.all_points().await {
        Ok(points) => json_response(StatusCode::OK, &points),
        Err(e) => {
            error!(error = %e, "Point listing failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ApiErrorBody {
                    error: "Database Error".to_string(),
                    details: Some(e.to_string()),
                    ..Default::default()
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use async_trait::async_trait;
    use erddap_protocol::MeasurementKind;
    use measurement_store::{
        CachedMeasurement, CellKey, MeasurementStore, MemoryStore, StoreError, StoreResult,
        StoredPoint,
    };

    use crate::config::ApiConfig;

    struct BrokenStore;

    #[async_trait]
    impl MeasurementStore for BrokenStore {
        async fn find_exact(
            &self,
            _key: &CellKey,
            _kind: MeasurementKind,
        ) -> StoreResult<Option<CachedMeasurement>> {
            Err(StoreError::Query("lost connection".to_string()))
        }

        async fn find_latest(
            &self,
            _key: &CellKey,
            _kind: MeasurementKind,
        ) -> StoreResult<Option<CachedMeasurement>> {
            Err(StoreError::Query("lost connection".to_string()))
        }

        async fn upsert(
            &self,
            _key: &CellKey,
            _kind: MeasurementKind,
            _value: Option<f64>,
        ) -> StoreResult<u64> {
            Err(StoreError::Write("lost connection".to_string()))
        }

        async fn all_points(&self) -> StoreResult<Vec<StoredPoint>> {
            Err(StoreError::Query("lost connection".to_string()))
        }
    }

    fn state_with(store: Arc<dyn MeasurementStore>) -> Arc<AppState> {
        Arc::new(AppState::new(&ApiConfig::from_env(), store).unwrap())
    }

    #[tokio::test]
    async fn test_listing_returns_ok() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert(
                &CellKey::new(45.0, 0.0, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()),
                MeasurementKind::Temperature,
                Some(14.2),
            )
            .await
            .unwrap();

        let response = map_points_handler(Extension(state_with(store))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_store_failure_returns_server_error() {
        let response = map_points_handler(Extension(state_with(Arc::new(BrokenStore)))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
