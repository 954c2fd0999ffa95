//! Open positions and closed trade records.

use chrono::NaiveDateTime;

use super::sizing::SizingParams;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for Buy, -1 for Sell.
    pub fn direction(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Maximum holding horizon reached without touching stop or target.
    Timeout,
    /// Data ran out while the position was still open.
    SessionEnd,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::TakeProfit => write!(f, "TAKE_PROFIT"),
            ExitReason::Timeout => write!(f, "TIMEOUT"),
            ExitReason::SessionEnd => write!(f, "SESSION_END"),
        }
    }
}

/// An open (simulated) trade. Mutated only by price updates while open.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lot_size: f64,
    pub entry_time: NaiveDateTime,
}

impl Position {
    /// Mark-to-market P&L at `price`, before commission.
    pub fn unrealized_pnl(&self, price: f64, sizing: &SizingParams) -> f64 {
        if sizing.point_size <= 0.0 {
            return 0.0;
        }
        let points = (price - self.entry_price) / sizing.point_size;
        points * sizing.value_per_point * self.lot_size * self.side.direction()
    }
}

/// Immutable closed record of a position. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lot_size: f64,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub exit_reason: ExitReason,
    pub pnl: f64,
    pub commission: f64,
    /// Net signed slippage across entry and exit fills.
    pub slippage: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
