//! Command-line client for the medical cost prediction API.

use std::path::PathBuf;

use medcost_lib::config::AppConfig;
use medcost_lib::error::AppError;
use medcost_lib::logging;
use medcost_lib::models::prediction_types::{BatchLoadOutcome, BatchOutcome, SingleOutcome, SingleResultView};
use medcost_lib::models::record_types::SingleForm;
use medcost_lib::models::table_types::PreviewTable;
use medcost_lib::services::flows::PredictionSession;
use medcost_lib::services::render_service;
use medcost_lib::services::ui_slots::{FlowKind, PreviewSlot, UiSlots};

#[tokio::main]
async fn main() {
    if let Err(err) = logging::init() {
        eprintln!("{err}");
    }
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the requested action succeeded.
async fn run() -> Result<bool, String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(true);
    };
    let config = match &options.config_path {
        Some(path) => AppConfig::load(path).map_err(|err| err.to_string())?,
        None => AppConfig::default(),
    };
    let session = PredictionSession::new(&config);
    let slots = TerminalSlots {
        out_dir: options.out_dir.clone(),
    };

    match options.command {
        Command::Single(form) => {
            let outcome = session.single.submit(&form, &slots).await;
            Ok(matches!(outcome, SingleOutcome::Predicted { .. }))
        }
        Command::Batch(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if let BatchLoadOutcome::Rejected { .. } = session.batch.load_file(&file_name, bytes, &slots) {
                return Ok(false);
            }
            match session.batch.submit(&slots).await {
                BatchOutcome::Completed { rows } => {
                    println!("{rows} prediction(s) received.");
                    Ok(true)
                }
                BatchOutcome::Failed { message } => {
                    eprintln!("{message}");
                    Ok(false)
                }
                BatchOutcome::NotReady | BatchOutcome::Busy => Ok(false),
            }
        }
        Command::Health => {
            let health = session.client.health().await.map_err(|err| err.to_string())?;
            println!("API {}: {}", session.client.base_url(), health.status);
            if let Some(loaded) = health.model_loaded {
                println!("Model loaded: {loaded}");
            }
            if let Some(detail) = health.detail {
                println!("{detail}");
            }
            Ok(health.status == "ok")
        }
    }
}

struct TerminalSlots {
    out_dir: PathBuf,
}

impl UiSlots for TerminalSlots {
    fn set_status(&self, _flow: FlowKind, text: &str) {
        if !text.is_empty() {
            eprintln!("{text}");
        }
    }

    fn show_single_result(&self, view: &SingleResultView) {
        println!("Prediction: {}", view.value);
        println!("{}", view.details);
    }

    fn show_batch_validation(&self, message: &str) {
        println!("{message}");
    }

    fn set_batch_submit_enabled(&self, _enabled: bool) {}

    fn show_preview(&self, slot: PreviewSlot, preview: Option<&PreviewTable>) {
        let Some(preview) = preview else {
            return;
        };
        let title = match slot {
            PreviewSlot::Upload => "Input preview",
            PreviewSlot::Result => "Prediction preview",
        };
        println!("{title} ({} of {} rows):", preview.rows.len(), preview.total_rows);
        println!("{}", preview.headers.join("\t"));
        for row in &preview.rows {
            println!("{}", row.join("\t"));
        }
    }

    fn offer_download(&self, file_name: &str, contents: &str) -> Result<(), AppError> {
        let path = render_service::write_download(&self.out_dir, file_name, contents)?;
        println!("Saved {}", path.display());
        Ok(())
    }
}

enum Command {
    Single(SingleForm),
    Batch(PathBuf),
    Health,
}

struct Options {
    command: Command,
    config_path: Option<PathBuf>,
    out_dir: PathBuf,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let Some(command) = args.first() else {
        println!("{}", help_text());
        return Ok(None);
    };
    let mut form = SingleForm::default();
    let mut batch_path: Option<PathBuf> = None;
    let mut config_path = None;
    let mut out_dir = PathBuf::from(".");

    let mut idx = 1usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        if matches!(flag, "-h" | "--help") {
            println!("{}", help_text());
            return Ok(None);
        }
        if !flag.starts_with("--") {
            if command == "batch" && batch_path.is_none() {
                batch_path = Some(PathBuf::from(flag));
                idx += 1;
                continue;
            }
            return Err(format!("Unexpected argument: {flag}\n\n{}", help_text()));
        }
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))?
            .to_string();
        match flag {
            "--age" => form.age = value,
            "--sex" => form.sex = value,
            "--bmi" => form.bmi = value,
            "--children" => form.children = value,
            "--smoker" => form.smoker = value,
            "--region" => form.region = value,
            "--config" => config_path = Some(PathBuf::from(value)),
            "--out" => out_dir = PathBuf::from(value),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let command = match command.as_str() {
        "-h" | "--help" => {
            println!("{}", help_text());
            return Ok(None);
        }
        "single" => Command::Single(form),
        "batch" => Command::Batch(
            batch_path.ok_or_else(|| "batch requires a CSV file path".to_string())?,
        ),
        "health" => Command::Health,
        other => return Err(format!("Unknown command: {other}\n\n{}", help_text())),
    };

    Ok(Some(Options {
        command,
        config_path,
        out_dir,
    }))
}

fn help_text() -> &'static str {
    r"medcost-cli

Usage:
  medcost-cli single --age <n> --sex <male|female> --bmi <n> --children <n>
                     --smoker <yes|no> --region <southeast|southwest|northeast|northwest>
  medcost-cli batch <file.csv> [--out <dir>]
  medcost-cli health

Options:
  --config <path>   TOML config file (api_base_url, preview_rows, download_file_name)
  --out <dir>       Directory for predictions.csv (default: current directory)
  -h, --help        Show this help"
}
