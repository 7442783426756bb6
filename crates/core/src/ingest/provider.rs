use crate::config::Settings;
use crate::domain::Series;
use crate::ingest::error::FetchError;
use anyhow::{Context, Result};
use std::time::Duration;

#[async_trait::async_trait]
pub trait SeriesClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// One GET, no retry. Safe to re-issue with the same URL.
    async fn fetch_series(&self, url: &str) -> std::result::Result<Series, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpSeriesClient {
    http: reqwest::Client,
}

impl HttpSeriesClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build CDC http client")?;
        Ok(Self { http })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(Duration::from_secs(settings.cdc_timeout_secs))
    }
}

#[async_trait::async_trait]
impl SeriesClient for HttpSeriesClient {
    fn provider_name(&self) -> &'static str {
        "cdc_socrata"
    }

    async fn fetch_series(&self, url: &str) -> std::result::Result<Series, FetchError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport {
                detail: format!("{err:#}"),
            })?;

        let status = res.status();
        if status.as_u16() >= 400 {
            // The status decides; an unreadable error body is reported empty.
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(http_status = %status, "CDC request rejected");
            return Err(FetchError::bad_status(status.as_u16(), &body));
        }

        let text = res.text().await.map_err(|err| FetchError::Transport {
            detail: format!("failed to read response body: {err:#}"),
        })?;

        let series = parse_series(&text)?;
        tracing::debug!(records = series.len(), "CDC series fetched");
        Ok(series)
    }
}

pub fn parse_series(body: &str) -> std::result::Result<Series, FetchError> {
    serde_json::from_str::<Series>(body).map_err(|err| FetchError::Parse {
        detail: err.to_string(),
    })
}
