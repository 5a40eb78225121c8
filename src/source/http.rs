use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::{config::ServiceConfig, geom::FeatureCollection, types::BoundaryLevel};
use super::{query_pairs, GeometrySource};

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("geodrill/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("[http] Failed to build client")
}

/// Boundary service client: `GET {base_url}/{level}?state=..&district=..`.
#[derive(Debug, Clone)]
pub struct HttpGeometrySource {
    base_url: String,
    client: Client,
}

impl HttpGeometrySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), client: build_client(timeout)? })
    }

    /// Boundary service at `config.base_url`, with the configured timeout.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    #[inline] pub fn base_url(&self) -> &str { &self.base_url }

    pub fn url_for(&self, level: BoundaryLevel) -> String {
        format!("{}/{}", self.base_url, level.to_str())
    }
}

impl GeometrySource for HttpGeometrySource {
    fn fetch(&self, level: BoundaryLevel, parents: &[Arc<str>]) -> Result<FeatureCollection> {
        let url = self.url_for(level);
        let query = query_pairs(parents);
        debug!(%url, ?query, "GET boundaries");

        let bytes = self.client.get(&url)
            .query(&query)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?
            .bytes()
            .with_context(|| format!("GET {url} body"))?;

        FeatureCollection::from_geojson_bytes(&bytes)
            .with_context(|| format!("[http] Invalid boundary payload from {url}"))
    }
}
