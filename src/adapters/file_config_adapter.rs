//! INI file configuration adapter.
//!
//! Wraps `configparser` behind [`ConfigPort`] and provides loader functions
//! that assemble the domain parameter structs from a config, falling back to
//! the documented defaults for missing keys. Malformed values that have a
//! default silently fall back; structurally invalid combinations (inverted
//! ranges, out-of-range hours) are hard errors.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::GoldtrendError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::signal::{SessionWindow, SignalParams};
use crate::domain::sizing::SizingParams;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GoldtrendError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| GoldtrendError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, GoldtrendError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| GoldtrendError::ConfigParse {
                file: "<inline>".into(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> GoldtrendError {
    GoldtrendError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn get_period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, GoldtrendError> {
    let value = config.get_int("indicators", key, default as i64);
    if value < 1 {
        return Err(invalid("indicators", key, "period must be at least 1"));
    }
    Ok(value as usize)
}

pub fn load_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, GoldtrendError> {
    let defaults = IndicatorParams::default();
    Ok(IndicatorParams {
        ema_short: get_period(config, "ema_short", defaults.ema_short)?,
        ema_medium: get_period(config, "ema_medium", defaults.ema_medium)?,
        ema_long: get_period(config, "ema_long", defaults.ema_long)?,
        macd_fast: get_period(config, "macd_fast", defaults.macd_fast)?,
        macd_slow: get_period(config, "macd_slow", defaults.macd_slow)?,
        macd_signal: get_period(config, "macd_signal", defaults.macd_signal)?,
        rsi_period: get_period(config, "rsi_period", defaults.rsi_period)?,
        adx_period: get_period(config, "adx_period", defaults.adx_period)?,
        atr_period: get_period(config, "atr_period", defaults.atr_period)?,
    })
}

/// Parse `[sessions]` into hour windows.
///
/// Disabled or absent sections yield no windows, which the signal engine
/// treats as always in session. The `windows` key holds comma-separated
/// `start-end` hour pairs; the default set approximates the Asia, London
/// and New York sessions.
pub fn load_sessions(config: &dyn ConfigPort) -> Result<Vec<SessionWindow>, GoldtrendError> {
    if !config.get_bool("sessions", "enabled", false) {
        return Ok(Vec::new());
    }

    let raw = config
        .get_string("sessions", "windows")
        .unwrap_or_else(|| "0-9,7-16,12-21".to_string());

    let mut windows = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (start, end) = part.split_once('-').ok_or_else(|| {
            invalid("sessions", "windows", format!("expected start-end, got {:?}", part))
        })?;
        let start_hour: u32 = start.trim().parse().map_err(|_| {
            invalid("sessions", "windows", format!("invalid hour {:?}", start))
        })?;
        let end_hour: u32 = end.trim().parse().map_err(|_| {
            invalid("sessions", "windows", format!("invalid hour {:?}", end))
        })?;
        if start_hour > 23 || end_hour > 23 {
            return Err(invalid("sessions", "windows", "hours must be 0-23"));
        }
        windows.push(SessionWindow {
            start_hour,
            end_hour,
        });
    }
    Ok(windows)
}

pub fn load_signal_params(config: &dyn ConfigPort) -> Result<SignalParams, GoldtrendError> {
    let d = SignalParams::default();
    let params = SignalParams {
        macd_hist_threshold: config.get_double("signal", "macd_hist_threshold", d.macd_hist_threshold),
        macd_floor: config.get_double("signal", "macd_floor", d.macd_floor),
        adx_threshold: config.get_double("signal", "adx_threshold", d.adx_threshold),
        rsi_buy_min: config.get_double("signal", "rsi_buy_min", d.rsi_buy_min),
        rsi_buy_max: config.get_double("signal", "rsi_buy_max", d.rsi_buy_max),
        rsi_sell_min: config.get_double("signal", "rsi_sell_min", d.rsi_sell_min),
        rsi_sell_max: config.get_double("signal", "rsi_sell_max", d.rsi_sell_max),
        sl_multiplier: config.get_double("signal", "sl_multiplier", d.sl_multiplier),
        tp_multiplier: config.get_double("signal", "tp_multiplier", d.tp_multiplier),
        require_pullback_to_ema20: config.get_bool(
            "signal",
            "require_pullback_to_ema20",
            d.require_pullback_to_ema20,
        ),
        pullback_tolerance_pct: config.get_double(
            "signal",
            "pullback_tolerance_pct",
            d.pullback_tolerance_pct,
        ),
        sessions: load_sessions(config)?,
    };

    if params.rsi_buy_min > params.rsi_buy_max {
        return Err(invalid("signal", "rsi_buy_min", "buy band is inverted"));
    }
    if params.rsi_sell_min > params.rsi_sell_max {
        return Err(invalid("signal", "rsi_sell_min", "sell band is inverted"));
    }
    if params.sl_multiplier <= 0.0 {
        return Err(invalid("signal", "sl_multiplier", "must be positive"));
    }
    if params.tp_multiplier <= 0.0 {
        return Err(invalid("signal", "tp_multiplier", "must be positive"));
    }
    Ok(params)
}

pub fn load_sizing_params(config: &dyn ConfigPort) -> Result<SizingParams, GoldtrendError> {
    let d = SizingParams::default();
    let lot_precision = config.get_int("sizing", "lot_precision", d.lot_precision as i64);
    // Guard the i64 -> u32 conversion: a negative value would wrap and turn
    // the rounding scale degenerate, rounding lots below min_lot.
    if !(0..=8).contains(&lot_precision) {
        return Err(invalid("sizing", "lot_precision", "must be in 0..=8"));
    }
    let params = SizingParams {
        point_size: config.get_double("sizing", "point_size", d.point_size),
        value_per_point: config.get_double("sizing", "value_per_point", d.value_per_point),
        min_lot: config.get_double("sizing", "min_lot", d.min_lot),
        max_lot: config.get_double("sizing", "max_lot", d.max_lot),
        lot_precision: lot_precision as u32,
    };

    if params.point_size <= 0.0 {
        return Err(invalid("sizing", "point_size", "must be positive"));
    }
    if params.value_per_point <= 0.0 {
        return Err(invalid("sizing", "value_per_point", "must be positive"));
    }
    if params.min_lot <= 0.0 {
        return Err(invalid("sizing", "min_lot", "must be positive"));
    }
    if params.min_lot > params.max_lot {
        return Err(invalid("sizing", "min_lot", "exceeds max_lot"));
    }
    Ok(params)
}

pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, GoldtrendError> {
    let d = BacktestConfig::default();
    let slippage_min = config.get_double("backtest", "slippage_min", d.slippage_range.0);
    let slippage_max = config.get_double("backtest", "slippage_max", d.slippage_range.1);
    let rng_seed = config
        .get_string("backtest", "rng_seed")
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| invalid("backtest", "rng_seed", format!("invalid seed {:?}", s)))
        })
        .transpose()?;

    // Counts must be validated as i64 before the unsigned casts below;
    // negative values would wrap into effectively-infinite limits.
    for key in ["max_consecutive_losses", "cooldown_bars", "max_holding_bars"] {
        if config.get_int("backtest", key, 0) < 0 {
            return Err(invalid("backtest", key, "must not be negative"));
        }
    }

    let result = BacktestConfig {
        initial_balance: config.get_double("backtest", "initial_balance", d.initial_balance),
        risk_percent: config.get_double("backtest", "risk_percent", d.risk_percent),
        commission_per_lot: config.get_double("backtest", "commission_per_lot", d.commission_per_lot),
        slippage_range: (slippage_min, slippage_max),
        max_consecutive_losses: config.get_int(
            "backtest",
            "max_consecutive_losses",
            d.max_consecutive_losses as i64,
        ) as u32,
        cooldown_bars: config.get_int("backtest", "cooldown_bars", d.cooldown_bars as i64) as usize,
        max_holding_bars: config.get_int("backtest", "max_holding_bars", d.max_holding_bars as i64)
            as usize,
        rng_seed,
    };

    if result.initial_balance <= 0.0 {
        return Err(invalid("backtest", "initial_balance", "must be positive"));
    }
    if result.risk_percent <= 0.0 || result.risk_percent > 100.0 {
        return Err(invalid("backtest", "risk_percent", "must be in (0, 100]"));
    }
    if result.commission_per_lot < 0.0 {
        return Err(invalid("backtest", "commission_per_lot", "must not be negative"));
    }
    if slippage_min > slippage_max {
        return Err(invalid("backtest", "slippage_min", "exceeds slippage_max"));
    }
    if result.max_holding_bars == 0 {
        return Err(invalid("backtest", "max_holding_bars", "must be at least 1"));
    }
    Ok(result)
}
