use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::table_types::{CsvTable, PreviewTable};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

pub fn preview(table: &CsvTable, limit: usize) -> PreviewTable {
    PreviewTable {
        headers: table.headers.clone(),
        rows: table.rows.iter().take(limit).cloned().collect(),
        total_rows: table.row_count(),
    }
}

/// Format an amount the way the UI shows predictions: `$4,321.90`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.001 rounds to 0.00 and must not print as negative
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Write a download verbatim into `dir`, creating the directory if needed.
pub fn write_download(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| AppError {
        message: format!("Failed to create directory {}: {}", dir.display(), e),
    })?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|e| AppError {
        message: format!("Failed to write {}: {}", path.display(), e),
    })?;
    Ok(path)
}

/// Like `write_download`, but never replaces an existing file: a taken name
/// becomes `predictions (1).csv`, `predictions (2).csv`, and so on.
pub fn write_download_unique(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| AppError {
        message: format!("Failed to create directory {}: {}", dir.display(), e),
    })?;

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().to_string());

    let mut attempt = 0usize;
    loop {
        let candidate = match (attempt, &extension) {
            (0, _) => file_name.to_string(),
            (n, Some(ext)) => format!("{} ({}).{}", stem, n, ext),
            (n, None) => format!("{} ({})", stem, n),
        };
        let path = dir.join(&candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes()).map_err(|e| AppError {
                    message: format!("Failed to write {}: {}", path.display(), e),
                })?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(AppError {
                    message: format!("Failed to create {}: {}", path.display(), e),
                })
            }
        }
    }
}
