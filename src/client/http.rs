use super::{Endpoint, Extractor};
use crate::config::Config;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Blocking client for the Tika REST API. The inner connection pool is reused
/// across every request of a run.
pub struct TikaClient {
    cfg: Config,
    base_url: String,
    http: Client,
}

impl TikaClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.server.timeout_seconds))
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self {
            cfg: cfg.clone(),
            base_url: cfg.base_url().to_string(),
            http,
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path(&self.cfg.endpoints))
    }
}

impl Extractor for TikaClient {
    fn put(&self, endpoint: Endpoint, file: &Path) -> Result<String> {
        let url = self.url(endpoint);
        let body = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
        debug!("PUT {url} accept={} bytes={}", endpoint.accept(), body.len());

        let resp = self
            .http
            .put(&url)
            .header(ACCEPT, endpoint.accept())
            .body(body)
            .send()
            .with_context(|| format!("PUT {url} for {}", file.display()))?
            .error_for_status()
            .with_context(|| format!("PUT {url} for {}", file.display()))?;

        resp.text()
            .with_context(|| format!("reading response body from {url}"))
    }
}
