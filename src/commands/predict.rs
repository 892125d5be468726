use std::path::Path;
use tauri::{AppHandle, State};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::prediction_types::{BatchLoadOutcome, BatchOutcome, HealthStatus, SingleOutcome};
use crate::models::record_types::SingleForm;
use crate::services::flows::PredictionSession;
use crate::services::ui_slots::EventSlots;

#[tauri::command]
pub async fn submit_single(
    app: AppHandle,
    session: State<'_, PredictionSession>,
    form: SingleForm,
) -> Result<SingleOutcome, AppError> {
    let slots = EventSlots::new(app);
    Ok(session.single.submit(&form, &slots).await)
}

#[tauri::command]
pub async fn load_batch_file(
    app: AppHandle,
    session: State<'_, PredictionSession>,
    path: String,
) -> Result<BatchLoadOutcome, AppError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| AppError {
        message: format!("Failed to read {}: {}", path, e),
    })?;
    let file_name = Path::new(&path)
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let slots = EventSlots::new(app);
    Ok(session.batch.load_file(&file_name, bytes, &slots))
}

#[tauri::command]
pub async fn submit_batch(
    app: AppHandle,
    session: State<'_, PredictionSession>,
) -> Result<BatchOutcome, AppError> {
    let slots = EventSlots::new(app);
    Ok(session.batch.submit(&slots).await)
}

#[tauri::command]
pub async fn get_api_status(session: State<'_, PredictionSession>) -> Result<HealthStatus, AppError> {
    Ok(session.client.health().await?)
}

#[tauri::command]
pub fn get_config(config: State<'_, AppConfig>) -> AppConfig {
    config.inner().clone()
}
