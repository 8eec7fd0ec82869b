//! Upload processing pipeline
//!
//! load → normalize → derive → aggregate → render. Every stage returns
//! `ProfitResult`, so the first failure short-circuits the rest.

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::chart::{self, ChartOptions};
use crate::core::{derive_table, summarize};
use crate::error::ProfitResult;
use crate::parser::{load_table, load_table_from_path, resolve_columns, RawTable};
use crate::types::{PageState, Summary, Table, Totals};

/// Derived table plus its totals, before any rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub table: Table,
    pub totals: Totals,
}

impl Analysis {
    /// Attach the rendered chart and produce the page summary
    pub fn into_summary(self, plot_url: String) -> Summary {
        Summary {
            totals: self.totals,
            data: self.table.rows,
            plot_url,
            extra_columns: self.table.extra_columns,
        }
    }
}

fn analyze_raw(raw: RawTable) -> ProfitResult<Analysis> {
    let columns = resolve_columns(&raw.headers)?;
    let table = derive_table(&raw, columns)?;
    let totals = summarize(&table);

    debug!(
        rows = table.row_count(),
        revenue = totals.revenue,
        margin = totals.margin,
        "table analyzed"
    );

    Ok(Analysis { table, totals })
}

/// Everything except the chart
pub fn analyze<R: Read>(reader: R) -> ProfitResult<Analysis> {
    analyze_raw(load_table(reader)?)
}

pub fn analyze_file(path: &Path) -> ProfitResult<Analysis> {
    analyze_raw(load_table_from_path(path)?)
}

fn finish(analysis: Analysis, options: &ChartOptions) -> ProfitResult<Summary> {
    let plot_url = chart::render_data_uri(&analysis.table, options)?;
    Ok(analysis.into_summary(plot_url))
}

/// Full pipeline over an in-memory upload
pub fn process<R: Read>(reader: R, options: &ChartOptions) -> ProfitResult<Summary> {
    finish(analyze(reader)?, options)
}

/// Full pipeline over a stored upload
pub fn process_file(path: &Path, options: &ChartOptions) -> ProfitResult<Summary> {
    finish(analyze_file(path)?, options)
}

impl From<ProfitResult<Summary>> for PageState {
    fn from(result: ProfitResult<Summary>) -> Self {
        match result {
            Ok(summary) => PageState::ResultReady(summary),
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "upload processing failed");
                PageState::Error(e.user_message())
            }
        }
    }
}
