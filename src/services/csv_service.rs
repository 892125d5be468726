use crate::error::AppError;
use crate::models::table_types::CsvTable;
use csv::ReaderBuilder;

/// Parse CSV bytes with a header row.
///
/// Blank lines are skipped. Rows made only of delimiters are kept so the
/// validator sees them. Short rows are padded with empty values so every row
/// lines up with the header.
pub fn parse_csv(bytes: &[u8]) -> Result<CsvTable, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

pub fn parse_csv_text(text: &str) -> Result<CsvTable, AppError> {
    parse_csv(text.as_bytes())
}
