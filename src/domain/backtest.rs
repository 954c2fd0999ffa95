//! Bar-by-bar backtest simulator.
//!
//! Replays a historical bar series through the signal rule engine, simulates
//! fills with slippage and commission, and tracks the account. One position
//! at a time: NO_POSITION -> OPEN -> CLOSED -> NO_POSITION, with the forward
//! scan resolving each position before the loop resumes at the exit bar.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::account::{AccountState, EquityPoint};
use super::bar::{validate_series, Bar};
use super::error::GoldtrendError;
use super::indicator::{compute_snapshots, IndicatorParams, MIN_BARS};
use super::position::{ExitReason, Side, Trade};
use super::signal::{evaluate, SignalParams};
use super::sizing::SizingParams;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Percent of balance risked per trade.
    pub risk_percent: f64,
    /// Flat commission per 1.0 lot per side; charged on entry and exit.
    pub commission_per_lot: f64,
    /// Uniform slippage range in price units, applied to each fill.
    pub slippage_range: (f64, f64),
    /// Pause signal evaluation once this many losses occur in a row.
    pub max_consecutive_losses: u32,
    /// Bars to wait before re-entering in the same direction.
    pub cooldown_bars: usize,
    /// Forward-scan horizon; positions still open after this are timed out.
    pub max_holding_bars: usize,
    /// Seed for the slippage RNG; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: 10_000.0,
            risk_percent: 1.0,
            commission_per_lot: 7.0,
            slippage_range: (-0.1, 0.1),
            max_consecutive_losses: 3,
            cooldown_bars: 6,
            max_holding_bars: 240,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub account: AccountState,
    pub equity_curve: Vec<EquityPoint>,
    pub bars_evaluated: usize,
    pub signals: usize,
}

/// Scan forward from the bar after `entry_index` for a stop or target hit.
///
/// A BUY hits its target when a bar's high reaches it and its stop when a
/// bar's low reaches it; SELL mirrors. When both trigger within the same bar
/// the stop wins: with only OHLC data the intrabar path is unknown, and the
/// pessimistic reading keeps backtest results honest.
///
/// No hit within `max_holding_bars` closes at the last scanned bar's close
/// with [`ExitReason::Timeout`]; running out of data first closes at the
/// final close with [`ExitReason::SessionEnd`].
pub fn resolve_exit(
    bars: &[Bar],
    entry_index: usize,
    side: Side,
    stop_loss: f64,
    take_profit: f64,
    max_holding_bars: usize,
) -> (usize, f64, ExitReason) {
    let scan_end = (entry_index + max_holding_bars).min(bars.len() - 1);

    for (j, bar) in bars.iter().enumerate().take(scan_end + 1).skip(entry_index + 1) {
        match side {
            Side::Buy => {
                if bar.low <= stop_loss {
                    return (j, stop_loss, ExitReason::StopLoss);
                }
                if bar.high >= take_profit {
                    return (j, take_profit, ExitReason::TakeProfit);
                }
            }
            Side::Sell => {
                if bar.high >= stop_loss {
                    return (j, stop_loss, ExitReason::StopLoss);
                }
                if bar.low <= take_profit {
                    return (j, take_profit, ExitReason::TakeProfit);
                }
            }
        }
    }

    let reason = if entry_index + max_holding_bars > bars.len() - 1 {
        ExitReason::SessionEnd
    } else {
        ExitReason::Timeout
    };
    (scan_end, bars[scan_end].close, reason)
}

fn draw_slippage(rng: &mut StdRng, range: (f64, f64)) -> f64 {
    let (lo, hi) = range;
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Run a full backtest over `bars`.
///
/// Requires at least [`MIN_BARS`] bars and strictly ordered timestamps;
/// anything less aborts rather than trading on undefined indicators.
pub fn run_backtest(
    symbol: &str,
    bars: &[Bar],
    indicator_params: &IndicatorParams,
    signal_params: &SignalParams,
    sizing: &SizingParams,
    config: &BacktestConfig,
) -> Result<BacktestResult, GoldtrendError> {
    validate_series(bars)?;

    if bars.len() < MIN_BARS {
        return Err(GoldtrendError::InsufficientData {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum: MIN_BARS,
        });
    }

    // Indicators are causal, so one pass over the full series gives every
    // decision point the same values a bar-by-bar recomputation would.
    let snapshots = compute_snapshots(bars, indicator_params);

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut account = AccountState::new(config.initial_balance);
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::new();
    let mut last_entry: [Option<usize>; 2] = [None, None];
    let mut bars_evaluated = 0usize;
    let mut signals = 0usize;

    let mut i = MIN_BARS;
    while i < bars.len() {
        // Loss-streak pause: keep advancing, lift once a win resets the count.
        if account.consecutive_losses >= config.max_consecutive_losses {
            i += 1;
            continue;
        }

        bars_evaluated += 1;
        let decision = evaluate(
            &bars[i],
            &snapshots[i],
            i + 1,
            account.balance,
            config.risk_percent,
            signal_params,
            sizing,
        );

        let Some(side) = decision.side() else {
            i += 1;
            continue;
        };

        let side_slot = match side {
            Side::Buy => 0,
            Side::Sell => 1,
        };
        if let Some(prev) = last_entry[side_slot] {
            if i - prev < config.cooldown_bars {
                i += 1;
                continue;
            }
        }

        signals += 1;
        last_entry[side_slot] = Some(i);

        let entry_slip = draw_slippage(&mut rng, config.slippage_range);
        let entry_fill = decision.entry_price + entry_slip;

        let (exit_index, exit_base, exit_reason) = resolve_exit(
            bars,
            i,
            side,
            decision.stop_loss,
            decision.take_profit,
            config.max_holding_bars,
        );

        let exit_slip = draw_slippage(&mut rng, config.slippage_range);
        let exit_fill = exit_base + exit_slip;

        let commission = config.commission_per_lot * decision.lot_size * 2.0;
        let points = (exit_fill - entry_fill) / sizing.point_size;
        let pnl =
            points * sizing.value_per_point * decision.lot_size * side.direction() - commission;

        account.apply_close(pnl);
        equity_curve.push(EquityPoint {
            time: bars[exit_index].timestamp,
            equity: account.balance,
        });

        trades.push(Trade {
            side,
            entry_price: entry_fill,
            exit_price: exit_fill,
            stop_loss: decision.stop_loss,
            take_profit: decision.take_profit,
            lot_size: decision.lot_size,
            entry_time: bars[i].timestamp,
            exit_time: bars[exit_index].timestamp,
            exit_reason,
            pnl,
            commission,
            slippage: entry_slip + exit_slip,
        });

        // The position occupied the bars through its exit; resume there.
        i = exit_index.max(i) + 1;
    }

    Ok(BacktestResult {
        trades,
        account,
        equity_curve,
        bars_evaluated,
        signals,
    })
}
