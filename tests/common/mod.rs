#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use goldtrend::domain::backtest::BacktestConfig;
pub use goldtrend::domain::bar::Bar;
use goldtrend::domain::error::GoldtrendError;
use goldtrend::domain::signal::SignalParams;
use goldtrend::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, GoldtrendError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GoldtrendError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<Bar> = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect();
        if bars.is_empty() {
            return Err(GoldtrendError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, GoldtrendError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GoldtrendError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.timestamp).min().unwrap();
                let max = bars.iter().map(|b| b.timestamp).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Hourly bar `i` hours after the base time, with a one-unit range around
/// the close.
pub fn make_bar(i: usize, close: f64) -> Bar {
    Bar {
        timestamp: base_time() + Duration::hours(i as i64),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// Linear climb from `start` to `end` over `n` hourly bars.
pub fn rising_bars(n: usize, start: f64, end: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| make_bar(i, start + (end - start) * i as f64 / (n - 1) as f64))
        .collect()
}

/// Constant close with a real high-low range, so ATR stays positive while
/// ADX sits at zero.
pub fn flat_bars(n: usize, close: f64) -> Vec<Bar> {
    (0..n).map(|i| make_bar(i, close)).collect()
}

/// Thresholds pinned for the monotone-rise fixture: RSI saturates at 100
/// there and the MACD histogram decays toward zero, so the default bands
/// block every entry.
pub fn rising_profile() -> SignalParams {
    SignalParams {
        macd_hist_threshold: 0.0,
        rsi_buy_max: 100.0,
        ..SignalParams::default()
    }
}

pub fn seeded_config(seed: u64) -> BacktestConfig {
    BacktestConfig {
        rng_seed: Some(seed),
        ..BacktestConfig::default()
    }
}
