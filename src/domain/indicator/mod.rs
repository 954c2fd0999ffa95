//! Technical indicator engine.
//!
//! Each indicator lives in its own module as a free function over `&[Bar]`
//! producing one value per input bar, causally: the value at bar i depends
//! only on bars 0..=i. Warmup values are 0.0, never NaN; decision logic
//! additionally gates on [`MIN_BARS`] before trusting any of them.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

use crate::domain::bar::Bar;

pub use adx::AdxPoint;
pub use macd::MacdPoint;

/// Minimum history before indicator values are considered reliable.
/// Driven by the longest lookback in the set (EMA 200).
pub const MIN_BARS: usize = 200;

/// Spans and periods for the full indicator set.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ema_short: usize,
    pub ema_medium: usize,
    pub ema_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_short: 20,
            ema_medium: 50,
            ema_long: 200,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            rsi_period: rsi::DEFAULT_PERIOD,
            adx_period: adx::DEFAULT_PERIOD,
            atr_period: atr::DEFAULT_PERIOD,
        }
    }
}

/// Read-only indicator values derived for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub rsi: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub adx: f64,
    pub atr: f64,
}

/// Compute one snapshot per bar for the whole series.
///
/// Every underlying indicator is streaming-compatible, so a single pass over
/// the full series yields the same values a bar-by-bar recomputation would.
pub fn compute_snapshots(bars: &[Bar], params: &IndicatorParams) -> Vec<IndicatorSnapshot> {
    let ema_short = ema::calculate_ema(bars, params.ema_short);
    let ema_medium = ema::calculate_ema(bars, params.ema_medium);
    let ema_long = ema::calculate_ema(bars, params.ema_long);
    let macd = macd::calculate_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);
    let rsi = rsi::calculate_rsi(bars, params.rsi_period);
    let adx = adx::calculate_adx(bars, params.adx_period);
    let atr = atr::calculate_atr(bars, params.atr_period);

    (0..bars.len())
        .map(|i| IndicatorSnapshot {
            ema20: ema_short[i],
            ema50: ema_medium[i],
            ema200: ema_long[i],
            macd: macd[i].macd,
            macd_signal: macd[i].signal,
            macd_histogram: macd[i].histogram,
            rsi: rsi[i],
            plus_di: adx[i].plus_di,
            minus_di: adx[i].minus_di,
            adx: adx[i].adx,
            atr: atr[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.2).sin() * 5.0 + i as f64 * 0.1;
                Bar {
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap()
                        + chrono::Duration::hours(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    #[test]
    fn snapshots_length_matches_bars() {
        let bars = make_bars(250);
        let snaps = compute_snapshots(&bars, &IndicatorParams::default());
        assert_eq!(snaps.len(), 250);
    }

    #[test]
    fn snapshots_are_causal() {
        // Truncating the tail must not change earlier snapshots.
        let bars = make_bars(250);
        let params = IndicatorParams::default();
        let full = compute_snapshots(&bars, &params);
        let truncated = compute_snapshots(&bars[..220], &params);

        for i in 0..220 {
            assert_relative_eq!(full[i].ema20, truncated[i].ema20);
            assert_relative_eq!(full[i].macd_histogram, truncated[i].macd_histogram);
            assert_relative_eq!(full[i].rsi, truncated[i].rsi);
            assert_relative_eq!(full[i].adx, truncated[i].adx);
            assert_relative_eq!(full[i].atr, truncated[i].atr);
        }
    }

    #[test]
    fn altering_future_bars_does_not_leak() {
        let bars = make_bars(250);
        let params = IndicatorParams::default();
        let before = compute_snapshots(&bars, &params);

        let mut mutated = bars.clone();
        for bar in &mut mutated[230..] {
            bar.close *= 2.0;
            bar.high *= 2.0;
            bar.low *= 2.0;
        }
        let after = compute_snapshots(&mutated, &params);

        for i in 0..230 {
            assert_relative_eq!(before[i].ema200, after[i].ema200);
            assert_relative_eq!(before[i].adx, after[i].adx);
        }
    }

    #[test]
    fn no_nan_anywhere() {
        let bars = make_bars(300);
        for snap in compute_snapshots(&bars, &IndicatorParams::default()) {
            assert!(snap.ema20.is_finite());
            assert!(snap.macd.is_finite());
            assert!(snap.rsi.is_finite());
            assert!(snap.adx.is_finite());
            assert!(snap.atr.is_finite());
        }
    }

    #[test]
    fn empty_series() {
        let snaps = compute_snapshots(&[], &IndicatorParams::default());
        assert!(snaps.is_empty());
    }
}
