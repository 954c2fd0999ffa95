//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first price, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//!
//! This is the plain recursive (non-adjusted) EMA: every bar has a value,
//! but the first ~span bars carry heavy seed bias and callers must gate on
//! a minimum history before trusting them.

use crate::domain::bar::Bar;

/// EMA of closes over the whole series, one value per bar.
pub fn calculate_ema(bars: &[Bar], span: usize) -> Vec<f64> {
    ema_of_values(&bars.iter().map(|b| b.close).collect::<Vec<_>>(), span)
}

/// Recursive EMA over an arbitrary value series (used for the MACD signal line).
pub fn ema_of_values(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return vec![0.0; values.len()];
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
        out.push(ema);
    }

    out
}
