use serde::Serialize;

/// A parsed CSV file: header names plus rows of raw string values.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Value of `column` in row `row`; empty when the row is short or the
    /// column does not exist.
    pub fn value(&self, row: usize, column: &str) -> &str {
        let Some(idx) = self.headers.iter().position(|h| h == column) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|r| r.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// First rows of a table, ready to be drawn by the UI.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}
