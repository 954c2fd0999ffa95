//! RSI (Relative Strength Index) indicator.
//!
//! Average gain and average loss are simple rolling-window means over the
//! last `period` price changes (not Wilder-smoothed, unlike ATR/ADX here).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! If avg_loss == 0: RSI = 100.
//! Warmup (fewer than `period` changes available): 0.0.

use crate::domain::bar::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; bars.len()];
    if period == 0 || bars.len() < 2 {
        return out;
    }

    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

    // RSI at bar i uses changes[i-period..i], i.e. the last `period` moves.
    for i in period..bars.len() {
        let window = &changes[i - period..i];
        let avg_gain: f64 =
            window.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
        let avg_loss: f64 =
            -window.iter().filter(|&&c| c < 0.0).sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
    }

    out
}
