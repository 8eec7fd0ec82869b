//! CSV loading and schema normalization
//!
//! Reads the uploaded file into raw string records and resolves the
//! required columns by their normalized (trimmed, lowercased) names.

use crate::error::{ProfitError, ProfitResult};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const REVENUE_COLUMN: &str = "revenue";
pub const COST_COLUMN: &str = "cost";
pub const DATE_COLUMN: &str = "date";

/// Parsed CSV before any typing
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Normalized header names, in file order
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Positions of the columns the pipeline cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub revenue: usize,
    pub cost: usize,
    pub date: Option<usize>,
}

impl ColumnMap {
    /// True when `index` is one of the columns consumed by derivation
    pub fn is_consumed(&self, index: usize) -> bool {
        index == self.revenue || index == self.cost || self.date == Some(index)
    }
}

/// Header normalization: surrounding whitespace removed, lowercase
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Load a CSV file from disk
pub fn load_table_from_path(path: &Path) -> ProfitResult<RawTable> {
    let file = File::open(path)?;
    load_table(file)
}

/// Load CSV from any reader. The first row is the header.
///
/// Short rows are kept (their missing trailing fields read as blank);
/// rows with more fields than the header are an error.
pub fn load_table<R: Read>(reader: R) -> ProfitResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    if headers.is_empty() {
        return Err(ProfitError::EmptyFile);
    }

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    for (idx, record) in records.iter().enumerate() {
        if record.len() > headers.len() {
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            return Err(ProfitError::TooManyFields {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
    }

    Ok(RawTable { headers, records })
}

/// Find revenue, cost and (optionally) date among normalized headers.
///
/// Duplicate names resolve to the first occurrence.
pub fn resolve_columns(headers: &[String]) -> ProfitResult<ColumnMap> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let revenue = position(REVENUE_COLUMN);
    let cost = position(COST_COLUMN);

    match (revenue, cost) {
        (Some(revenue), Some(cost)) => Ok(ColumnMap {
            revenue,
            cost,
            date: position(DATE_COLUMN),
        }),
        _ => {
            let missing = [(REVENUE_COLUMN, revenue), (COST_COLUMN, cost)]
                .iter()
                .filter(|(_, found)| found.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            Err(ProfitError::MissingColumns(missing))
        }
    }
}
