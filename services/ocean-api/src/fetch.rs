//! Upstream point fetching.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use erddap_protocol::{ErddapError, GriddapQuery, GriddapResponse, PointSample};

use crate::config::ApiConfig;

/// Contract for fetching a single grid cell from the upstream service.
///
/// One attempt per call, no retries. An in-grid cell with no data is a
/// successful fetch with an absent value; errors are reserved for transport
/// and protocol failures.
#[async_trait]
pub trait PointFetcher: Send + Sync {
    async fn fetch_point(&self, query: &GriddapQuery<'_>) -> Result<PointSample, ErddapError>;
}

/// Live griddap client.
pub struct ErddapClient {
    client: Client,
    base_url: String,
}

impl ErddapClient {
    /// Build a client from service configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.erddap_timeout)
            .danger_accept_invalid_certs(config.erddap_accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.erddap_base_url.clone(),
        })
    }
}

#[async_trait]
impl PointFetcher for ErddapClient {
    async fn fetch_point(&self, query: &GriddapQuery<'_>) -> Result<PointSample, ErddapError> {
        let url = query.url(&self.base_url);
        debug!(url = %url, "Fetching upstream point");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| ErddapError::Transport {
                    message: e.to_string(),
                    query: query.query_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "Upstream returned an error status");
            return Err(ErddapError::UpstreamStatus {
                status: status.as_u16(),
                query: query.query_string(),
            });
        }

        let body: GriddapResponse = response
            .json()
            .await
            .map_err(|e| ErddapError::InvalidBody(e.to_string()))?;

        let sample = body
            .table
            .extract_point(query.descriptor().variable, query.time());
        debug!(
            value = ?sample.value,
            observed_time = %sample.observed_time,
            "Upstream sample extracted"
        );

        Ok(sample)
    }
}
