use serde::{Deserialize, Serialize};

use super::record_types::SingleRecord;

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub data: &'a SingleRecord,
}

/// Body of `GET /health` on the prediction API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// What the single-result slot shows: the headline value and the text below it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SingleResultView {
    pub value: String,
    pub details: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SingleOutcome {
    Predicted { prediction: f64, formatted: String },
    Invalid { errors: Vec<String> },
    Failed { message: String },
    Busy,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchLoadOutcome {
    Accepted { rows: usize },
    Rejected { errors: Vec<String> },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed { rows: usize },
    NotReady,
    Failed { message: String },
    Busy,
}
