//! CLI command handlers

pub mod commands;

pub use commands::{chart, serve, summarize};
