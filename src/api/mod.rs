//! ProfitView HTTP surface
//!
//! Upload page at `/`, JSON summary at `/api/v1/summary`.
//! Run with `profitview serve` or `profitview-server`.

pub mod handlers;
pub mod page;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
