//! Column totals and profit margin

use crate::types::{Table, Totals};

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Profit as a percentage of revenue, rounded to two decimals.
/// Zero revenue gives a margin of zero.
pub fn margin(total_profit: f64, total_revenue: f64) -> f64 {
    if total_revenue == 0.0 {
        return 0.0;
    }
    round2(total_profit / total_revenue * 100.0)
}

/// Reduce the table to totals and margin. Missing amounts are skipped.
pub fn summarize(table: &Table) -> Totals {
    let (revenue, cost, profit) = table
        .rows
        .iter()
        .fold((0.0, 0.0, 0.0), |(r, c, p), row| {
            (
                r + row.revenue.unwrap_or(0.0),
                c + row.cost.unwrap_or(0.0),
                p + row.profit.unwrap_or(0.0),
            )
        });

    Totals {
        revenue,
        cost,
        profit,
        margin: margin(profit, revenue),
    }
}
