//! ProfitView server binary
//!
//! Serves the CSV upload page and the JSON summary endpoint.

use clap::Parser;
use royalbit_profitview::api::{run_api_server, ApiConfig};
use royalbit_profitview::chart::ChartOptions;
use royalbit_profitview::storage::DEFAULT_UPLOAD_DIR;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "profitview-server")]
#[command(version)]
#[command(author = "RoyalBit Inc. <admin@royalbit.ca>")]
#[command(about = "ProfitView Server - upload a revenue/cost CSV, get totals, margin and a chart")]
#[command(long_about = r#"
ProfitView Server

Endpoints:
  - GET  /                 - Upload form
  - POST /                 - Upload a CSV (multipart field "file"), HTML result
  - POST /api/v1/summary   - Same upload, JSON result
  - GET  /health           - Health check
  - GET  /version          - Server version info

Uploaded files are kept in the upload directory under their client
filename; a later upload with the same name replaces the earlier one.

Example usage:
  profitview-server                           # Start on localhost:8080
  profitview-server --host 0.0.0.0 --port 3000 --upload-dir /var/lib/profitview

  curl -F "file=@sales.csv" http://localhost:8080/api/v1/summary
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PROFITVIEW_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PROFITVIEW_PORT")]
    port: u16,

    /// Directory where uploaded files are stored
    #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "PROFITVIEW_UPLOAD_DIR")]
    upload_dir: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value_t = ChartOptions::default().width)]
    chart_width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = ChartOptions::default().height)]
    chart_height: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        upload_dir: args.upload_dir,
        chart: ChartOptions {
            width: args.chart_width,
            height: args.chart_height,
        },
    };

    run_api_server(config).await
}
