use std::path::Path;
use std::time::Duration;

use healthlens_types::{InsightsData, TimeSeriesQuery, TimeSeriesResult, UploadResponse};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::payload::{Operation, service_error};
use crate::{FetchError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for [`AnalyticsClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Applied by the HTTP stack; `None` keeps its default behaviour
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Client for the analytics service endpoints
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /metrics/timeseries`
    pub async fn fetch_time_series(&self, query: &TimeSeriesQuery) -> Result<TimeSeriesResult> {
        let url = self.endpoint("/metrics/timeseries");
        let pairs = query.query_pairs();
        tracing::debug!(%url, ?pairs, "fetching time series");

        let response = self.http.get(&url).query(&pairs).send().await?;
        let result: TimeSeriesResult = decode(response, Operation::TimeSeries).await?;

        tracing::debug!(
            metric = %result.metric,
            points = result.points.len(),
            decomposed = result.decomposition.is_some(),
            "time series received"
        );
        Ok(result)
    }

    /// `GET /metrics/insights`
    pub async fn fetch_insights(&self) -> Result<InsightsData> {
        let url = self.endpoint("/metrics/insights");
        tracing::debug!(%url, "fetching insights");

        let response = self.http.get(&url).send().await?;
        decode(response, Operation::Insights).await
    }

    /// `POST /upload` with the export file as multipart field `file`.
    ///
    /// Only `.xml` files are sent; anything else is rejected locally.
    pub async fn upload(&self, path: &Path) -> Result<UploadResponse> {
        let file_name = validate_export_file(path)?;
        let bytes = tokio::fs::read(path).await?;
        tracing::info!(file = %file_name, bytes = bytes.len(), "uploading export");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/xml")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        decode(response, Operation::Upload).await
    }
}

/// Check the export file name before reading it
pub fn validate_export_file(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FetchError::InvalidFile("Please select a file first.".to_string()))?;

    if !file_name.to_ascii_lowercase().ends_with(".xml") {
        return Err(FetchError::InvalidFile(
            "Please select a valid XML file.".to_string(),
        ));
    }

    Ok(file_name.to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, op: Operation) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let err = service_error(status.as_u16(), &body, op);
        tracing::warn!(status = status.as_u16(), error = %err, ?op, "service rejected request");
        return Err(err);
    }

    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AnalyticsClient::new(ClientOptions {
            base_url: "http://localhost:8000/".to_string(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint("/metrics/insights"),
            "http://localhost:8000/metrics/insights"
        );
    }

    #[test]
    fn test_validate_export_file() {
        assert_eq!(
            validate_export_file(&PathBuf::from("/tmp/export.XML")).unwrap(),
            "export.XML"
        );
        assert_eq!(
            validate_export_file(&PathBuf::from("/tmp/export.csv")),
            Err(FetchError::InvalidFile(
                "Please select a valid XML file.".to_string()
            ))
        );
    }
}
