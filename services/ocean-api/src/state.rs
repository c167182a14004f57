//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use measurement_store::MeasurementStore;

use crate::config::ApiConfig;
use crate::fetch::ErddapClient;
use crate::resolver::Resolver;

/// Clock used to derive implicit probe timestamps. Injected so tests and
/// replay runs can pin it.
pub type ReferenceTime = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// State shared across request handlers.
pub struct AppState {
    /// Measurement cache, also served directly by the point listing.
    pub store: Arc<dyn MeasurementStore>,

    /// Cache-or-fetch pipeline for measurement requests.
    pub resolver: Arc<Resolver>,

    /// Clock for implicit probe timestamps.
    pub reference_time: ReferenceTime,
}

impl AppState {
    /// Build the state from configuration and a connected store.
    pub fn new(config: &ApiConfig, store: Arc<dyn MeasurementStore>) -> anyhow::Result<Self> {
        let fetcher = Arc::new(ErddapClient::new(config)?);

        Ok(Self {
            resolver: Arc::new(Resolver::new(store.clone(), fetcher)),
            store,
            reference_time: Arc::new(Utc::now),
        })
    }

    /// Replace the clock.
    pub fn with_reference_time(mut self, reference_time: ReferenceTime) -> Self {
        self.reference_time = reference_time;
        self
    }
}
