use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppError;
use crate::services::render_service::DEFAULT_PREVIEW_ROWS;

/// Prediction API the app talks to unless a config file says otherwise.
/// Can be replaced at build time through `MEDCOST_API_BASE_URL`.
pub const DEFAULT_API_BASE_URL: &str = match option_env!("MEDCOST_API_BASE_URL") {
    Some(url) => url,
    None => "https://ml-medical-coasts-kz1m.onrender.com",
};

pub const CONFIG_FILE_NAME: &str = "medcost.toml";
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "predictions.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub preview_rows: usize,
    pub download_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            download_file_name: DEFAULT_DOWNLOAD_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Read a TOML config file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| AppError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Ok(toml::from_str(&content)?)
    }
}
