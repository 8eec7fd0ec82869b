//! Derivation stage
//! Profit per row, and the date axis (parsed or synthesized)

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::error::{ProfitError, ProfitResult};
use crate::parser::{ColumnMap, RawTable};
use crate::types::{Record, Table};

/// First synthetic date, used when the upload has no `date` column
pub const SYNTHETIC_EPOCH: (i32, u32, u32) = (2024, 1, 1);

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn epoch() -> NaiveDate {
    let (y, m, d) = SYNTHETIC_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// One date per row: epoch, epoch + 1 day, ...
pub fn synthetic_dates(count: usize) -> Vec<NaiveDate> {
    let start = epoch();
    (0..count as u64)
        .map_while(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}

/// Parse a calendar date. Date-time values keep only the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Blank cells are missing values; anything else must be a finite number
fn parse_amount(raw: &str, line: usize, column: &str) -> ProfitResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || ProfitError::InvalidNumber {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    };

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(invalid())
    }
}

/// Turn raw records into typed rows with `Profit` and `Date` filled in
pub fn derive_table(raw: &RawTable, columns: ColumnMap) -> ProfitResult<Table> {
    let extra_columns: Vec<(usize, &String)> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !columns.is_consumed(*idx))
        .collect();

    let synthetic = match columns.date {
        Some(_) => Vec::new(),
        None => synthetic_dates(raw.row_count()),
    };

    let mut rows = Vec::with_capacity(raw.row_count());

    for (idx, record) in raw.records.iter().enumerate() {
        // header is line 1; short rows read as blank
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        let field = |i: usize| record.get(i).unwrap_or("");

        let revenue = parse_amount(field(columns.revenue), line, "Revenue")?;
        let cost = parse_amount(field(columns.cost), line, "Cost")?;

        let date = match columns.date {
            Some(i) => parse_date(field(i)).ok_or_else(|| ProfitError::InvalidDate {
                line,
                value: field(i).to_string(),
            })?,
            None => synthetic.get(idx).copied().ok_or_else(|| ProfitError::InvalidDate {
                line,
                value: format!("synthetic day {}", idx),
            })?,
        };

        let extra: BTreeMap<String, String> = extra_columns
            .iter()
            .map(|(i, name)| ((*name).clone(), field(*i).to_string()))
            .collect();

        rows.push(Record::with_amounts(revenue, cost, date).with_extra(extra));
    }

    Ok(Table {
        extra_columns: extra_columns.into_iter().map(|(_, n)| n.clone()).collect(),
        rows,
        dates_from_input: columns.date.is_some(),
    })
}
