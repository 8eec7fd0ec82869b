use crate::api::{run_api_server, ApiConfig};
use crate::api::page::format_number;
use crate::chart::{render_png, ChartOptions};
use crate::error::ProfitResult;
use crate::pipeline::{self, Analysis};
use crate::types::{Record, Totals};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON shape printed by `summarize --json` (no chart)
#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    totals: Totals,
    data: &'a [Record],
}

fn print_totals(totals: &Totals, rows: usize) {
    println!("   Rows:          {}", rows);
    println!("   Total revenue: {}", format_number(totals.revenue).bold());
    println!("   Total cost:    {}", format_number(totals.cost).bold());

    let profit = format_number(totals.profit);
    if totals.profit < 0.0 {
        println!("   Total profit:  {}", profit.red().bold());
    } else {
        println!("   Total profit:  {}", profit.green().bold());
    }

    println!("   Margin:        {}", format!("{:.2}%", totals.margin).bold());
}

fn write_chart(analysis: &Analysis, output: &Path, options: &ChartOptions) -> ProfitResult<()> {
    let png = render_png(&analysis.table, options)?;
    fs::write(output, png)?;
    Ok(())
}

/// Execute the summarize command
pub fn summarize(file: PathBuf, json: bool, chart_output: Option<PathBuf>) -> ProfitResult<()> {
    let analysis = pipeline::analyze_file(&file)?;

    if let Some(ref output) = chart_output {
        write_chart(&analysis, output, &ChartOptions::default())?;
    }

    if json {
        let report = Report {
            totals: analysis.totals,
            data: &analysis.table.rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "📊 ProfitView - Summary".bold().green());
    println!("   File: {}", file.display());
    if !analysis.table.dates_from_input {
        println!("   {}", "No date column; using daily dates from 2024-01-01".yellow());
    }
    println!();
    print_totals(&analysis.totals, analysis.table.row_count());

    if let Some(output) = chart_output {
        println!();
        println!("{} {}", "✅ Chart written to".green(), output.display());
    }

    Ok(())
}

/// Execute the chart command
pub fn chart(file: PathBuf, output: PathBuf, width: u32, height: u32) -> ProfitResult<()> {
    let analysis = pipeline::analyze_file(&file)?;
    write_chart(&analysis, &output, &ChartOptions { width, height })?;

    println!(
        "{} {} ({}x{}, {} rows)",
        "✅ Chart written to".green(),
        output.display(),
        width,
        height,
        analysis.table.row_count()
    );
    Ok(())
}

/// Execute the serve command
pub fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_api_server(config))
}
