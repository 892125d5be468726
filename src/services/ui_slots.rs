use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use crate::error::AppError;
use crate::models::prediction_types::SingleResultView;
use crate::models::table_types::PreviewTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Single,
    Batch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewSlot {
    /// Rows of the file the user picked.
    Upload,
    /// Rows returned by `/predict_batch`.
    Result,
}

/// The named places in the UI the flows write to.
pub trait UiSlots: Send + Sync {
    /// Progress text for a flow; an empty string clears it.
    fn set_status(&self, flow: FlowKind, text: &str);
    fn show_single_result(&self, view: &SingleResultView);
    fn show_batch_validation(&self, message: &str);
    fn set_batch_submit_enabled(&self, enabled: bool);
    /// `None` hides the preview.
    fn show_preview(&self, slot: PreviewSlot, preview: Option<&PreviewTable>);
    fn offer_download(&self, file_name: &str, contents: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotEvent {
    Status(FlowKind, String),
    SingleResult(SingleResultView),
    BatchValidation(String),
    BatchSubmitEnabled(bool),
    Preview(PreviewSlot, Option<PreviewTable>),
    Download { file_name: String, contents: String },
}

/// In-memory slots that record every update in order.
#[derive(Default)]
pub struct MemorySlots {
    events: Mutex<Vec<SlotEvent>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SlotEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn events(&self) -> Vec<SlotEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every status text written for `flow`, in order.
    pub fn statuses(&self, flow: FlowKind) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SlotEvent::Status(f, text) if f == flow => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn single_result(&self) -> Option<SingleResultView> {
        self.events().into_iter().rev().find_map(|e| match e {
            SlotEvent::SingleResult(view) => Some(view),
            _ => None,
        })
    }

    pub fn batch_validation(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            SlotEvent::BatchValidation(message) => Some(message),
            _ => None,
        })
    }

    /// Submission starts disabled until a file passes validation.
    pub fn batch_submit_enabled(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                SlotEvent::BatchSubmitEnabled(enabled) => Some(enabled),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn preview(&self, slot: PreviewSlot) -> Option<PreviewTable> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                SlotEvent::Preview(s, table) if s == slot => Some(table),
                _ => None,
            })
            .flatten()
    }

    pub fn downloads(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SlotEvent::Download {
                    file_name,
                    contents,
                } => Some((file_name, contents)),
                _ => None,
            })
            .collect()
    }
}

impl UiSlots for MemorySlots {
    fn set_status(&self, flow: FlowKind, text: &str) {
        self.record(SlotEvent::Status(flow, text.to_string()));
    }

    fn show_single_result(&self, view: &SingleResultView) {
        self.record(SlotEvent::SingleResult(view.clone()));
    }

    fn show_batch_validation(&self, message: &str) {
        self.record(SlotEvent::BatchValidation(message.to_string()));
    }

    fn set_batch_submit_enabled(&self, enabled: bool) {
        self.record(SlotEvent::BatchSubmitEnabled(enabled));
    }

    fn show_preview(&self, slot: PreviewSlot, preview: Option<&PreviewTable>) {
        self.record(SlotEvent::Preview(slot, preview.cloned()));
    }

    fn offer_download(&self, file_name: &str, contents: &str) -> Result<(), AppError> {
        self.record(SlotEvent::Download {
            file_name: file_name.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use desktop::EventSlots;

#[cfg(feature = "desktop")]
mod desktop {
    use super::*;
    use crate::services::render_service;
    use tauri::{AppHandle, Emitter, Manager};

    /// Slots backed by Tauri events; the web UI listens and updates the DOM.
    pub struct EventSlots {
        app: AppHandle,
    }

    impl EventSlots {
        pub fn new(app: AppHandle) -> Self {
            Self { app }
        }
    }

    impl UiSlots for EventSlots {
        fn set_status(&self, flow: FlowKind, text: &str) {
            let _ = self.app.emit(
                "status-changed",
                serde_json::json!({ "flow": flow, "text": text }),
            );
        }

        fn show_single_result(&self, view: &SingleResultView) {
            let _ = self.app.emit("single-result", view);
        }

        fn show_batch_validation(&self, message: &str) {
            let _ = self.app.emit("batch-validation", message);
        }

        fn set_batch_submit_enabled(&self, enabled: bool) {
            let _ = self.app.emit("batch-submit-enabled", enabled);
        }

        fn show_preview(&self, slot: PreviewSlot, preview: Option<&PreviewTable>) {
            let _ = self.app.emit(
                "preview-changed",
                serde_json::json!({ "slot": slot, "table": preview }),
            );
        }

        fn offer_download(&self, file_name: &str, contents: &str) -> Result<(), AppError> {
            let dir = self.app.path().download_dir().map_err(|e| AppError {
                message: format!("Failed to resolve download directory: {}", e),
            })?;
            let path = render_service::write_download_unique(&dir, file_name, contents)?;
            let _ = self.app.emit(
                "download-ready",
                serde_json::json!({ "path": path.to_string_lossy() }),
            );
            Ok(())
        }
    }
}
