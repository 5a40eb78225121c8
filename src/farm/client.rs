use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::{config::ServiceConfig, source::build_client};
use super::{analysis::{AnalysisRequest, AnalysisResponse}, records::{FarmQuery, FarmRecord, Locations}};

/// Client for the farm-record and analysis services.
#[derive(Debug, Clone)]
pub struct FarmClient {
    base_url: String,
    analysis_url: String,
    client: Client,
}

impl FarmClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.farm_base_url.trim_end_matches('/').to_string(),
            analysis_url: config.analysis_url.clone(),
            client: build_client(config.timeout())?,
        })
    }

    /// `GET /locations`
    pub fn locations(&self) -> Result<Locations> {
        let url = format!("{}/locations", self.base_url);
        debug!(%url, "GET locations");
        self.client.get(&url).send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?
            .json()
            .with_context(|| format!("[farm] Invalid locations payload from {url}"))
    }

    /// `GET /data` filtered by `query`.
    pub fn records(&self, query: &FarmQuery) -> Result<Vec<FarmRecord>> {
        let url = format!("{}/data", self.base_url);
        debug!(%url, query = ?query.pairs(), "GET farm records");
        self.client.get(&url).query(&query.pairs()).send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?
            .json()
            .with_context(|| format!("[farm] Invalid records payload from {url}"))
    }

    /// Submit a field for analysis.
    pub fn submit_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let url = &self.analysis_url;
        debug!(%url, sub_district = %request.sub_district, "POST analysis");
        self.client.post(url).json(request).send()
            .with_context(|| format!("POST {url}"))?
            .error_for_status()
            .with_context(|| format!("POST {url} returned error status"))?
            .json()
            .with_context(|| format!("[farm] Invalid analysis response from {url}"))
    }
}
