//! OHLC bar representation and series validation.

use chrono::NaiveDateTime;

use super::error::GoldtrendError;

/// A single OHLC bar. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Check that a series has strictly increasing timestamps.
///
/// Duplicate or out-of-order timestamps are corrupted input, not a
/// recoverable trading condition, so this is a hard error.
pub fn validate_series(bars: &[Bar]) -> Result<(), GoldtrendError> {
    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(GoldtrendError::InvalidSeries {
                reason: format!(
                    "timestamps not strictly increasing at {} -> {}",
                    pair[0].timestamp, pair[1].timestamp
                ),
            });
        }
    }
    Ok(())
}
