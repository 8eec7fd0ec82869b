//! ProfitView - revenue/cost CSV summaries with a Revenue vs Profit chart
//!
//! Upload a CSV with `revenue` and `cost` columns (any case, any surrounding
//! whitespace) and an optional `date` column. ProfitView derives
//! `Profit = Revenue - Cost` per row, totals the columns, computes the profit
//! margin and renders a PNG chart of Revenue and Profit over time.
//!
//! # Features
//!
//! - HTML upload page and JSON endpoint (axum)
//! - CLI summaries and chart export
//! - Synthetic daily dates from 2024-01-01 when the upload has no `date`
//!
//! # Example
//!
//! ```no_run
//! use royalbit_profitview::chart::ChartOptions;
//! use royalbit_profitview::pipeline;
//! use std::path::Path;
//!
//! let summary = pipeline::process_file(Path::new("sales.csv"), &ChartOptions::default())?;
//!
//! println!("Revenue: {}", summary.totals.revenue);
//! println!("Margin:  {}%", summary.totals.margin);
//! # Ok::<(), royalbit_profitview::error::ProfitError>(())
//! ```

pub mod api;
pub mod chart;
pub mod cli;
pub mod core;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, ProfitError, ProfitResult};
pub use types::{PageState, Record, Summary, Table, Totals};
