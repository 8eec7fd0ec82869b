//! Core computation: per-row derivation and column aggregation

pub mod aggregate;
pub mod derive;

pub use aggregate::{margin, round2, summarize};
pub use derive::{derive_table, parse_date, synthetic_dates, SYNTHETIC_EPOCH};
