use serde::Serialize;

use crate::models::record_types::{parse_number, Region, Sex, SingleRecord, Smoker, REQUIRED_COLUMNS};
use crate::models::table_types::CsvTable;

/// Ordered list of validation messages. Empty means the input may be sent.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Check every field of a form record. Each failing field adds its own message.
pub fn validate_single(record: &SingleRecord) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !is_positive(record.age) {
        report.push("Invalid age");
    }
    if !is_positive(record.bmi) {
        report.push("Invalid BMI");
    }
    if !is_non_negative(record.children) {
        report.push("Invalid children");
    }

    check_choice(&mut report, "sex", &record.sex, Sex::parse(&record.sex).is_some());
    check_choice(
        &mut report,
        "smoker",
        &record.smoker,
        Smoker::parse(&record.smoker).is_some(),
    );
    check_choice(
        &mut report,
        "region",
        &record.region,
        Region::parse(&record.region).is_some(),
    );

    report
}

fn check_choice(report: &mut ValidationReport, field: &str, value: &str, known: bool) {
    if value.is_empty() {
        report.push(format!("Missing {}", field));
    } else if !known {
        report.push(format!("Invalid {}", field));
    }
}

/// Check an uploaded batch file.
///
/// An empty file or a missing column yields exactly one message and skips the
/// per-row checks. Row messages carry the 1-based file line (header is line 1).
pub fn validate_batch(table: &CsvTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    if table.is_empty() {
        report.push("Empty CSV file");
        return report;
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !table.has_column(column))
        .collect();
    if !missing.is_empty() {
        report.push(format!("Missing columns: {}", missing.join(", ")));
        return report;
    }

    for row in 0..table.row_count() {
        let line = row + 2;

        if !is_positive(parse_number(table.value(row, "age"))) {
            report.push(format!("Line {}: invalid age", line));
        }
        if !is_positive(parse_number(table.value(row, "bmi"))) {
            report.push(format!("Line {}: invalid BMI", line));
        }
        if !is_non_negative(parse_number(table.value(row, "children"))) {
            report.push(format!("Line {}: invalid children", line));
        }
        if Sex::parse(table.value(row, "sex")).is_none() {
            report.push(format!("Line {}: invalid sex", line));
        }
        if Smoker::parse(table.value(row, "smoker")).is_none() {
            report.push(format!("Line {}: invalid smoker", line));
        }
        if Region::parse(table.value(row, "region")).is_none() {
            report.push(format!("Line {}: invalid region", line));
        }
    }

    report
}
