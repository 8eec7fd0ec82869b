use clap::{Parser, Subcommand};
use royalbit_profitview::api::ApiConfig;
use royalbit_profitview::chart::ChartOptions;
use royalbit_profitview::cli;
use royalbit_profitview::storage::DEFAULT_UPLOAD_DIR;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "profitview")]
#[command(about = "Revenue, cost, profit and margin from a CSV, with a Revenue vs Profit chart.")]
#[command(long_about = "ProfitView - CSV profit summaries

INPUT:
  A CSV with a header row containing 'revenue' and 'cost' columns
  (case-insensitive, surrounding whitespace ignored) and an optional
  'date' column. Without 'date', rows get daily dates from 2024-01-01.

COMMANDS:
  summarize - Print totals and profit margin
  chart     - Render the Revenue and Profit chart to PNG
  serve     - Start the upload web server

EXAMPLES:
  profitview summarize sales.csv
  profitview summarize sales.csv --json
  profitview chart sales.csv sales.png --width 1200
  profitview serve --port 3000")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print totals and profit margin for a CSV file
    Summarize {
        /// Path to CSV file
        file: PathBuf,

        /// Print totals and rows as JSON
        #[arg(long)]
        json: bool,

        /// Also write the chart to this PNG file
        #[arg(short, long)]
        chart: Option<PathBuf>,
    },

    /// Render the Revenue and Profit chart to a PNG file
    Chart {
        /// Path to CSV file
        file: PathBuf,

        /// Output PNG path
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = ChartOptions::default().width)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = ChartOptions::default().height)]
        height: u32,
    },

    /// Start the upload web server
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PROFITVIEW_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "PROFITVIEW_PORT")]
        port: u16,

        /// Directory where uploaded files are stored
        #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "PROFITVIEW_UPLOAD_DIR")]
        upload_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { file, json, chart } => cli::summarize(file, json, chart)?,

        Commands::Chart {
            file,
            output,
            width,
            height,
        } => cli::chart(file, output, width, height)?,

        Commands::Serve {
            host,
            port,
            upload_dir,
        } => cli::serve(ApiConfig {
            host,
            port,
            upload_dir,
            ..ApiConfig::default()
        })?,
    }

    Ok(())
}
