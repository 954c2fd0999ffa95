//! Account balance, drawdown and loss-streak tracking.
//!
//! Owned exclusively by the backtest loop (or a live-loop equivalent);
//! updated synchronously on every trade close.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub time: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub balance: f64,
    pub equity: f64,
    pub peak_balance: f64,
    /// Worst peak-to-balance decline seen so far, in percent.
    pub max_drawdown: f64,
    pub consecutive_losses: u32,
    pub max_consecutive_losses: u32,
}

impl AccountState {
    pub fn new(initial_balance: f64) -> Self {
        AccountState {
            balance: initial_balance,
            equity: initial_balance,
            peak_balance: initial_balance,
            max_drawdown: 0.0,
            consecutive_losses: 0,
            max_consecutive_losses: 0,
        }
    }

    /// Fold a closed trade's P&L into the account.
    ///
    /// Peak balance is non-decreasing and max drawdown is monotone; the
    /// loss streak resets on any winning trade.
    pub fn apply_close(&mut self, pnl: f64) {
        self.balance += pnl;
        self.equity = self.balance;

        if self.balance > self.peak_balance {
            self.peak_balance = self.balance;
        }

        if self.peak_balance > 0.0 {
            let drawdown = (self.peak_balance - self.balance) / self.peak_balance * 100.0;
            if drawdown > self.max_drawdown {
                self.max_drawdown = drawdown;
            }
        }

        if pnl > 0.0 {
            self.consecutive_losses = 0;
        } else {
            self.consecutive_losses += 1;
            if self.consecutive_losses > self.max_consecutive_losses {
                self.max_consecutive_losses = self.consecutive_losses;
            }
        }
    }
}
