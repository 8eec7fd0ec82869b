use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//==============================================================================
// Table Model
//==============================================================================

/// One derived row of the uploaded table
///
/// A blank amount cell is a missing value (`None`, serialized as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Revenue")]
    pub revenue: Option<f64>,
    #[serde(rename = "Cost")]
    pub cost: Option<f64>,
    /// `revenue - cost`, missing when either side is missing
    #[serde(rename = "Profit")]
    pub profit: Option<f64>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Remaining input columns, keyed by normalized name
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    pub fn new(revenue: f64, cost: f64, date: NaiveDate) -> Self {
        Self::with_amounts(Some(revenue), Some(cost), date)
    }

    pub fn with_amounts(revenue: Option<f64>, cost: Option<f64>, date: NaiveDate) -> Self {
        Self {
            revenue,
            cost,
            profit: revenue.zip(cost).map(|(r, c)| r - c),
            date,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }
}

/// Ordered rows after normalization and derivation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Normalized names of the pass-through columns, in input order
    pub extra_columns: Vec<String>,
    pub rows: Vec<Record>,
    /// True when `Date` came from the input rather than the synthetic sequence
    pub dates_from_input: bool,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//==============================================================================
// Summary Model
//==============================================================================

/// Column totals and margin. Missing amounts are left out of the sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Percent, two decimals; 0 when revenue totals to zero
    pub margin: f64,
}

/// Everything the result page shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(flatten)]
    pub totals: Totals,
    pub data: Vec<Record>,
    /// `data:image/png;base64,...`
    pub plot_url: String,
    /// Pass-through column names in input order, for the rows table
    #[serde(skip)]
    pub extra_columns: Vec<String>,
}

/// Request outcome as seen by the page renderer
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    AwaitingUpload,
    ResultReady(Summary),
    Error(String),
}
