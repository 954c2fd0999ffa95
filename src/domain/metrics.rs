//! Performance metrics computed over a finished backtest.

use super::account::AccountState;
use super::position::Trade;

/// Summary statistics for a set of closed trades.
///
/// Zero-denominator cases collapse to defined sentinels rather than NaN:
/// no trades gives a 0% win rate, no losses with some profit gives an
/// infinite profit factor, and no trades at all gives a profit factor of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of trades with positive P&L.
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_pnl: f64,
    pub profit_factor: f64,
    /// Worst peak-to-trough balance decline, as a percentage of the peak.
    pub max_drawdown: f64,
    pub max_consecutive_losses: u32,
    pub trades_per_day: f64,
    pub avg_pnl_per_trade: f64,
    pub final_balance: f64,
    pub return_pct: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade], account: &AccountState, initial_balance: f64) -> Metrics {
        let total_trades = trades.len();
        let wins = trades.iter().filter(|t| t.is_win()).count();
        let losses = total_trades - wins;

        let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
        let gross_loss: f64 = trades
            .iter()
            .filter(|t| t.pnl <= 0.0)
            .map(|t| t.pnl.abs())
            .sum();
        let net_pnl = gross_profit - gross_loss;

        let win_rate = if total_trades > 0 {
            wins as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let trades_per_day = if total_trades > 0 {
            let first = trades.first().map(|t| t.entry_time.date()).unwrap_or_default();
            let last = trades.last().map(|t| t.exit_time.date()).unwrap_or_default();
            let days = (last - first).num_days().max(0) + 1;
            total_trades as f64 / days as f64
        } else {
            0.0
        };

        let avg_pnl_per_trade = if total_trades > 0 {
            net_pnl / total_trades as f64
        } else {
            0.0
        };

        let return_pct = if initial_balance > 0.0 {
            (account.balance - initial_balance) / initial_balance * 100.0
        } else {
            0.0
        };

        Metrics {
            total_trades,
            wins,
            losses,
            win_rate,
            gross_profit,
            gross_loss,
            net_pnl,
            profit_factor,
            max_drawdown: account.max_drawdown,
            max_consecutive_losses: account.max_consecutive_losses,
            trades_per_day,
            avg_pnl_per_trade,
            final_balance: account.balance,
            return_pct,
        }
    }
}
