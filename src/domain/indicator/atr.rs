//! ATR (Average True Range) indicator.
//!
//! TR[0] = high - low (no previous close); TR[i] per [`Bar::true_range`].
//! ATR uses Wilder's recursive smoothing with alpha = 1/period, seeded with
//! the first TR: ATR[i] = (ATR[i-1] * (period-1) + TR[i]) / period.

use crate::domain::bar::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<f64> {
    if bars.is_empty() || period == 0 {
        return vec![0.0; bars.len()];
    }

    let mut out = Vec::with_capacity(bars.len());
    let mut atr = bars[0].high - bars[0].low;
    out.push(atr);

    for i in 1..bars.len() {
        let tr = bars[i].true_range(bars[i - 1].close);
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
        out.push(atr);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bar(i: usize, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::hours(i as i64),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn atr_first_bar_is_range() {
        let bars = vec![make_bar(0, 110.0, 90.0, 100.0)];
        let atr = calculate_atr(&bars, 14);
        assert_relative_eq!(atr[0], 20.0);
    }

    #[test]
    fn atr_constant_range_stays_constant() {
        let bars: Vec<Bar> = (0..50).map(|i| make_bar(i, 110.0, 90.0, 100.0)).collect();
        let atr = calculate_atr(&bars, 14);
        for v in atr {
            assert_relative_eq!(v, 20.0);
        }
    }

    #[test]
    fn atr_flat_bars_is_zero() {
        let bars: Vec<Bar> = (0..30).map(|i| make_bar(i, 100.0, 100.0, 100.0)).collect();
        let atr = calculate_atr(&bars, 14);
        for v in atr {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn atr_wilder_recursion() {
        let bars = vec![
            make_bar(0, 110.0, 90.0, 100.0),
            make_bar(1, 120.0, 100.0, 115.0),
        ];
        let atr = calculate_atr(&bars, 14);
        // TR[1] = max(20, |120-100|, |100-100|) = 20
        let expected = (20.0 * 13.0 + 20.0) / 14.0;
        assert_relative_eq!(atr[1], expected);
    }

    #[test]
    fn atr_rises_on_expanding_range() {
        let mut bars: Vec<Bar> = (0..20).map(|i| make_bar(i, 101.0, 99.0, 100.0)).collect();
        bars.push(make_bar(20, 130.0, 70.0, 100.0));
        let atr = calculate_atr(&bars, 14);
        assert!(atr[20] > atr[19]);
    }
}
