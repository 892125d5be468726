use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::models::prediction_types::{HealthStatus, PredictRequest};
use crate::models::record_types::SingleRecord;

/// Failures talking to the prediction API.
///
/// `/predict` and `/predict_batch` report errors differently, so they map to
/// different variants: only the single endpoint carries a server detail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("API error (HTTP {status})")]
    BatchRejected { status: u16 },
    #[error("Unexpected API response: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `POST /predict` with `{"data": record}`; returns the `prediction` field.
    pub async fn submit_single(&self, record: &SingleRecord) -> Result<f64, ApiError> {
        let url = self.endpoint("predict");
        debug!(%url, "posting single record");

        let response = self
            .http
            .post(&url)
            .json(&PredictRequest { data: record })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&body, status.as_u16()),
            });
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        json.get("prediction")
            .and_then(Value::as_f64)
            .ok_or_else(|| ApiError::Decode("missing numeric `prediction` field".to_string()))
    }

    /// `POST /predict_batch` with the raw file as multipart field `file`.
    /// Returns the CSV body unchanged.
    pub async fn submit_batch(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let url = self.endpoint("predict_batch");
        debug!(%url, file_name, size = bytes.len(), "posting batch file");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BatchRejected {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("health");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Message for a rejected request: the JSON `detail` field when present,
/// otherwise the raw body.
fn extract_detail(body: &str, status: u16) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("detail").cloned())
        .filter(|detail| !detail.is_null());

    match detail {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => body.to_string(),
    }
}
