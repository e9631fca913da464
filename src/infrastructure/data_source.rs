use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::data_source::DataSource;
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Csv,
    Json,
}

/// Decoded source text plus a digest of the bytes it came from.
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub format: PayloadFormat,
    pub text: String,
    pub fingerprint: String,
}

impl RawPayload {
    pub fn from_bytes(format: PayloadFormat, bytes: &[u8]) -> Self {
        // BOM sniffing picks the encoding and drops the mark; defaults to UTF-8
        let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if had_errors {
            debug!(encoding = encoding.name(), "Replaced malformed sequences while decoding source");
        }

        Self {
            format,
            text: text.into_owned(),
            fingerprint: hex::encode(Sha256::digest(bytes)),
        }
    }
}

#[async_trait]
pub trait DataSourceClient {
    async fn fetch(&self, source: &DataSource) -> Result<RawPayload>;
}

/// Fetches remote sources over HTTP and local sources from disk.
pub struct HttpDataSource {
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn fetch_url(&self, url: &str, format: PayloadFormat) -> Result<RawPayload> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::TransportError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TransportError(format!(
                "Network error: {} while fetching {}",
                status, url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::TransportError(format!("Failed to read body: {}", e)))?;

        info!(url, bytes = bytes.len(), "Fetched data source");
        Ok(RawPayload::from_bytes(format, &bytes))
    }

    async fn fetch_file(&self, path: &Path) -> Result<RawPayload> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::TransportError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), bytes = bytes.len(), "Read local data source");
        Ok(RawPayload::from_bytes(format_for_path(path), &bytes))
    }
}

impl Default for HttpDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSourceClient for HttpDataSource {
    async fn fetch(&self, source: &DataSource) -> Result<RawPayload> {
        source.validate()?;

        match source {
            DataSource::Csv { url } => self.fetch_url(url, PayloadFormat::Csv).await,
            DataSource::Json { url } => self.fetch_url(url, PayloadFormat::Json).await,
            DataSource::Local { path } => self.fetch_file(path).await,
            DataSource::Unset => Err(AppError::ConfigError(
                "data source is not configured".to_string(),
            )),
        }
    }
}

fn format_for_path(path: &Path) -> PayloadFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => PayloadFormat::Json,
        _ => PayloadFormat::Csv,
    }
}
