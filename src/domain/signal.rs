//! Trend-following signal rule engine.
//!
//! Evaluates the latest bar's indicator snapshot against threshold rules and
//! produces exactly one of BUY/SELL/HOLD, with ATR-derived stop/target levels
//! and a risk-based lot size. All thresholds are explicit parameters; there
//! is no ambient configuration.

use chrono::Timelike;

use super::bar::Bar;
use super::indicator::{IndicatorSnapshot, MIN_BARS};
use super::position::Side;
use super::sizing::{position_size, SizingParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// One evaluation's outcome. A value object, never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: Signal,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lot_size: f64,
    pub rationale: String,
}

impl Decision {
    fn hold(entry_price: f64, rationale: String) -> Self {
        Decision {
            signal: Signal::Hold,
            entry_price,
            stop_loss: 0.0,
            take_profit: 0.0,
            lot_size: 0.0,
            rationale,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self.signal {
            Signal::Buy => Some(Side::Buy),
            Signal::Sell => Some(Side::Sell),
            Signal::Hold => None,
        }
    }
}

/// A trading-session hour window, half-open `[start_hour, end_hour)`.
///
/// Wrap-around windows (start > end) span midnight. Session boundaries are
/// policy, not universal truth: they live in configuration and default to
/// "always open" when none are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl SessionWindow {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Tunable thresholds for the rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    /// Minimum MACD histogram magnitude for an entry.
    pub macd_hist_threshold: f64,
    /// Loose MACD-line bound: BUY needs macd > -floor, SELL needs macd < +floor.
    pub macd_floor: f64,
    pub adx_threshold: f64,
    pub rsi_buy_min: f64,
    pub rsi_buy_max: f64,
    pub rsi_sell_min: f64,
    pub rsi_sell_max: f64,
    /// Stop distance in ATRs.
    pub sl_multiplier: f64,
    /// Target distance in ATRs.
    pub tp_multiplier: f64,
    pub require_pullback_to_ema20: bool,
    /// Maximum distance from EMA20 for the pullback gate, percent of EMA20.
    pub pullback_tolerance_pct: f64,
    /// Allowed trading-session windows; empty means always in session.
    pub sessions: Vec<SessionWindow>,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            macd_hist_threshold: 0.5,
            macd_floor: 0.5,
            adx_threshold: 25.0,
            rsi_buy_min: 40.0,
            rsi_buy_max: 65.0,
            rsi_sell_min: 35.0,
            rsi_sell_max: 60.0,
            sl_multiplier: 1.5,
            tp_multiplier: 2.5,
            require_pullback_to_ema20: false,
            pullback_tolerance_pct: 0.5,
            sessions: Vec::new(),
        }
    }
}

impl SignalParams {
    fn in_session(&self, hour: u32) -> bool {
        self.sessions.is_empty() || self.sessions.iter().any(|w| w.contains(hour))
    }
}

/// Evaluate the rule set at the latest bar.
///
/// `history_len` is the number of bars up to and including `bar`; evaluation
/// refuses to act (HOLD) below [`MIN_BARS`] since indicator values are still
/// seed-biased there. ATR at zero also short-circuits to HOLD: stop placement
/// and sizing are undefined without a volatility reading.
pub fn evaluate(
    bar: &Bar,
    snapshot: &IndicatorSnapshot,
    history_len: usize,
    balance: f64,
    risk_pct: f64,
    params: &SignalParams,
    sizing: &SizingParams,
) -> Decision {
    let entry = bar.close;

    if history_len < MIN_BARS {
        return Decision::hold(
            entry,
            format!("insufficient history ({history_len} of {MIN_BARS} bars)"),
        );
    }

    if !params.in_session(bar.timestamp.hour()) {
        return Decision::hold(entry, "out of session".into());
    }

    if snapshot.atr <= 0.0 {
        return Decision::hold(entry, "no volatility reading (ATR is zero)".into());
    }

    if params.require_pullback_to_ema20 {
        let distance_pct = if snapshot.ema20 > 0.0 {
            (entry - snapshot.ema20).abs() / snapshot.ema20 * 100.0
        } else {
            f64::INFINITY
        };
        if distance_pct > params.pullback_tolerance_pct {
            return Decision::hold(
                entry,
                format!(
                    "no pullback to EMA20 ({distance_pct:.2}% > {:.2}%)",
                    params.pullback_tolerance_pct
                ),
            );
        }
    }

    let bullish_stack =
        snapshot.ema20 > snapshot.ema50 && snapshot.ema50 > snapshot.ema200;
    let bearish_stack =
        snapshot.ema20 < snapshot.ema50 && snapshot.ema50 < snapshot.ema200;

    let buy = bullish_stack
        && snapshot.macd > -params.macd_floor
        && snapshot.macd_histogram >= params.macd_hist_threshold
        && snapshot.rsi >= params.rsi_buy_min
        && snapshot.rsi <= params.rsi_buy_max
        && snapshot.adx >= params.adx_threshold
        && snapshot.plus_di > snapshot.minus_di;

    let sell = bearish_stack
        && snapshot.macd < params.macd_floor
        && snapshot.macd_histogram <= -params.macd_hist_threshold
        && snapshot.rsi >= params.rsi_sell_min
        && snapshot.rsi <= params.rsi_sell_max
        && snapshot.adx >= params.adx_threshold
        && snapshot.plus_di < snapshot.minus_di;

    // The stacks are mutually exclusive, so buy and sell can never both hold.
    if buy || sell {
        let side = if buy { Side::Buy } else { Side::Sell };
        let sl_distance = params.sl_multiplier * snapshot.atr;
        let tp_distance = params.tp_multiplier * snapshot.atr;
        let (stop_loss, take_profit) = match side {
            Side::Buy => (entry - sl_distance, entry + tp_distance),
            Side::Sell => (entry + sl_distance, entry - tp_distance),
        };
        let lot_size = position_size(balance, risk_pct, entry, stop_loss, sizing);

        return Decision {
            signal: if buy { Signal::Buy } else { Signal::Sell },
            entry_price: entry,
            stop_loss,
            take_profit,
            lot_size,
            rationale: format!(
                "{side} setup: EMA stack aligned, ADX {:.1}, histogram {:.2}",
                snapshot.adx, snapshot.macd_histogram
            ),
        };
    }

    Decision::hold(entry, hold_rationale(snapshot, bullish_stack, bearish_stack, params))
}

/// Diagnostic text naming the broad condition groups that blocked an entry.
fn hold_rationale(
    snapshot: &IndicatorSnapshot,
    bullish_stack: bool,
    bearish_stack: bool,
    params: &SignalParams,
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if !bullish_stack && !bearish_stack {
        reasons.push("mixed EMA stack".into());
    }

    if snapshot.macd_histogram.abs() < params.macd_hist_threshold {
        reasons.push(format!(
            "MACD momentum too weak ({:.2} vs {:.2})",
            snapshot.macd_histogram, params.macd_hist_threshold
        ));
    }

    if snapshot.adx < params.adx_threshold {
        reasons.push(format!(
            "weak ADX ({:.1} < {:.1})",
            snapshot.adx, params.adx_threshold
        ));
    }

    if bullish_stack {
        if snapshot.rsi < params.rsi_buy_min || snapshot.rsi > params.rsi_buy_max {
            reasons.push(format!("RSI outside buy band ({:.1})", snapshot.rsi));
        }
        if snapshot.plus_di <= snapshot.minus_di {
            reasons.push("directional movement against trend".into());
        }
    } else if bearish_stack {
        if snapshot.rsi < params.rsi_sell_min || snapshot.rsi > params.rsi_sell_max {
            reasons.push(format!("RSI outside sell band ({:.1})", snapshot.rsi));
        }
        if snapshot.plus_di >= snapshot.minus_di {
            reasons.push("directional movement against trend".into());
        }
    }

    if reasons.is_empty() {
        // All individual gates passed yet no entry fired; MACD line sits
        // outside its loose floor.
        reasons.push("MACD line outside entry floor".into());
    }

    reasons.join("; ")
}
