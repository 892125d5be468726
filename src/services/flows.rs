use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::prediction_types::{BatchLoadOutcome, BatchOutcome, SingleOutcome, SingleResultView};
use crate::models::record_types::{SingleForm, SingleRecord};
use crate::services::api_client::PredictionClient;
use crate::services::csv_service;
use crate::services::render_service;
use crate::services::ui_slots::{FlowKind, PreviewSlot, UiSlots};
use crate::services::validation;

pub const NO_VALUE: &str = "—";
pub const STATUS_COMPUTING: &str = "Computing…";
pub const STATUS_READING: &str = "Reading file…";
pub const STATUS_SENDING: &str = "🚀 Sending to API…";
pub const STATUS_PREDICTING: &str = "🧠 Predicting…";
pub const STATUS_DONE: &str = "✅ Predictions complete";
pub const STATUS_FAILED: &str = "❌ Prediction failed";
pub const FILE_VALID: &str = "✅ File is valid";

/// At most one request per flow. A second submission while one is
/// outstanding is turned away instead of racing the first.
#[derive(Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

pub struct InFlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Clears a flow's status text when dropped, whatever the request's outcome.
struct StatusGuard<'a, S: UiSlots + ?Sized> {
    slots: &'a S,
    flow: FlowKind,
}

impl<S: UiSlots + ?Sized> Drop for StatusGuard<'_, S> {
    fn drop(&mut self) {
        self.slots.set_status(self.flow, "");
    }
}

pub struct SingleFlow {
    client: PredictionClient,
    in_flight: InFlight,
}

impl SingleFlow {
    pub fn new(client: PredictionClient) -> Self {
        Self {
            client,
            in_flight: InFlight::default(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub async fn submit<S: UiSlots + ?Sized>(&self, form: &SingleForm, slots: &S) -> SingleOutcome {
        self.submit_record(SingleRecord::from_form(form), slots).await
    }

    pub async fn submit_record<S: UiSlots + ?Sized>(&self, record: SingleRecord, slots: &S) -> SingleOutcome {
        let report = validation::validate_single(&record);
        if !report.is_valid() {
            warn!(errors = ?report.errors, "Single record failed validation");
            slots.show_single_result(&SingleResultView {
                value: NO_VALUE.to_string(),
                details: report.errors.join(" | "),
            });
            return SingleOutcome::Invalid {
                errors: report.errors,
            };
        }

        let Some(_in_flight) = self.in_flight.try_acquire() else {
            warn!("Single prediction already in flight, ignoring submission");
            return SingleOutcome::Busy;
        };

        slots.set_status(FlowKind::Single, STATUS_COMPUTING);
        let _status = StatusGuard {
            slots,
            flow: FlowKind::Single,
        };

        match self.client.submit_single(&record).await {
            Ok(prediction) => {
                let formatted = render_service::format_usd(prediction);
                info!(prediction, "Single prediction received");
                slots.show_single_result(&SingleResultView {
                    value: formatted.clone(),
                    details: serde_json::to_string_pretty(&record).unwrap_or_default(),
                });
                SingleOutcome::Predicted {
                    prediction,
                    formatted,
                }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "Single prediction failed");
                slots.show_single_result(&SingleResultView {
                    value: NO_VALUE.to_string(),
                    details: message.clone(),
                });
                SingleOutcome::Failed { message }
            }
        }
    }
}

/// A file that passed validation and is waiting to be submitted.
pub struct LoadedBatch {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

pub struct BatchFlow {
    client: PredictionClient,
    in_flight: InFlight,
    loaded: Mutex<Option<Arc<LoadedBatch>>>,
    preview_rows: usize,
    download_file_name: String,
}

impl BatchFlow {
    pub fn new(client: PredictionClient, preview_rows: usize, download_file_name: &str) -> Self {
        Self {
            client,
            in_flight: InFlight::default(),
            loaded: Mutex::new(None),
            preview_rows,
            download_file_name: download_file_name.to_string(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// The currently accepted file, if any.
    pub fn current(&self) -> Option<Arc<LoadedBatch>> {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, batch: Option<LoadedBatch>) {
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner) = batch.map(Arc::new);
    }

    /// Parse and validate a newly selected file. Replaces whatever was loaded
    /// before; a rejected file leaves nothing to submit.
    pub fn load_file<S: UiSlots + ?Sized>(&self, file_name: &str, bytes: Vec<u8>, slots: &S) -> BatchLoadOutcome {
        slots.set_status(FlowKind::Batch, STATUS_READING);

        let table = match csv_service::parse_csv(&bytes) {
            Ok(table) => table,
            Err(e) => return self.reject(file_name, vec![e.message], slots),
        };

        let report = validation::validate_batch(&table);
        if !report.is_valid() {
            return self.reject(file_name, report.errors, slots);
        }

        let rows = table.row_count();
        slots.show_batch_validation(FILE_VALID);
        slots.show_preview(
            PreviewSlot::Upload,
            Some(&render_service::preview(&table, self.preview_rows)),
        );
        self.replace(Some(LoadedBatch {
            file_name: file_name.to_string(),
            bytes,
            rows,
        }));
        slots.set_batch_submit_enabled(true);
        slots.set_status(FlowKind::Batch, "");

        info!(file_name, rows, "Batch file accepted");
        BatchLoadOutcome::Accepted { rows }
    }

    fn reject<S: UiSlots + ?Sized>(&self, file_name: &str, errors: Vec<String>, slots: &S) -> BatchLoadOutcome {
        warn!(file_name, errors = ?errors, "Batch file rejected");
        self.replace(None);
        slots.show_batch_validation(&format!("❌ {}", errors.join("\n")));
        slots.set_batch_submit_enabled(false);
        slots.show_preview(PreviewSlot::Upload, None);
        slots.set_status(FlowKind::Batch, "");
        BatchLoadOutcome::Rejected { errors }
    }

    /// Upload the accepted file to `/predict_batch`, preview the response and
    /// offer it as a download.
    pub async fn submit<S: UiSlots + ?Sized>(&self, slots: &S) -> BatchOutcome {
        let Some(batch) = self.current() else {
            return BatchOutcome::NotReady;
        };

        let Some(_in_flight) = self.in_flight.try_acquire() else {
            warn!("Batch prediction already in flight, ignoring submission");
            return BatchOutcome::Busy;
        };

        info!(file_name = %batch.file_name, rows = batch.rows, "Submitting batch file");
        slots.set_status(FlowKind::Batch, STATUS_SENDING);

        match self.run(&batch, slots).await {
            Ok(rows) => {
                info!(
                    file_name = %batch.file_name,
                    input_rows = batch.rows,
                    rows,
                    "Batch predictions complete"
                );
                slots.set_status(FlowKind::Batch, STATUS_DONE);
                BatchOutcome::Completed { rows }
            }
            Err(e) => {
                warn!(file_name = %batch.file_name, error = %e, "Batch prediction failed");
                slots.set_status(FlowKind::Batch, STATUS_FAILED);
                BatchOutcome::Failed { message: e.message }
            }
        }
    }

    async fn run<S: UiSlots + ?Sized>(&self, batch: &LoadedBatch, slots: &S) -> Result<usize, AppError> {
        slots.set_status(FlowKind::Batch, STATUS_PREDICTING);

        let text = self
            .client
            .submit_batch(&batch.file_name, batch.bytes.clone())
            .await?;
        let table = csv_service::parse_csv_text(&text)?;

        slots.show_preview(
            PreviewSlot::Result,
            Some(&render_service::preview(&table, self.preview_rows)),
        );
        slots.offer_download(&self.download_file_name, &text)?;

        Ok(table.row_count())
    }
}

/// Both flows wired to one API client.
pub struct PredictionSession {
    pub client: PredictionClient,
    pub single: SingleFlow,
    pub batch: BatchFlow,
}

impl PredictionSession {
    pub fn new(config: &AppConfig) -> Self {
        let client = PredictionClient::new(&config.api_base_url);
        Self {
            single: SingleFlow::new(client.clone()),
            batch: BatchFlow::new(client.clone(), config.preview_rows, &config.download_file_name),
            client,
        }
    }
}
