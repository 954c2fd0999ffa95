//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. All three EMAs are the
//! recursive first-value-seeded kind, so the output is defined at every bar
//! and callers gate on minimum history instead of a validity flag.

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::{calculate_ema, ema_of_values};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> Vec<MacdPoint> {
    if bars.is_empty() || fast == 0 || slow == 0 || signal_span == 0 {
        return vec![
            MacdPoint {
                macd: 0.0,
                signal: 0.0,
                histogram: 0.0,
            };
            bars.len()
        ];
    }

    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_of_values(&macd_line, signal_span);

    macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&macd, &signal)| MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        })
        .collect()
}

pub fn calculate_macd_default(bars: &[Bar]) -> Vec<MacdPoint> {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
