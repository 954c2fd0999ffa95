//! Plain-text report adapter.
//!
//! Writes a human-readable performance summary to the output path and a CSV
//! trade log next to it (same stem, `_trades.csv` suffix).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::GoldtrendError;
use crate::domain::metrics::Metrics;
use crate::domain::position::Trade;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

/// Render the summary block shown in reports and on stdout.
pub fn render_summary(result: &BacktestResult, metrics: &Metrics) -> String {
    let mut out = String::new();

    let profit_factor = if metrics.profit_factor.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", metrics.profit_factor)
    };

    let _ = writeln!(out, "=== Backtest Summary ===");
    let _ = writeln!(out, "Bars evaluated:     {}", result.bars_evaluated);
    let _ = writeln!(out, "Signals taken:      {}", result.signals);
    let _ = writeln!(out, "Total trades:       {}", metrics.total_trades);
    let _ = writeln!(
        out,
        "Wins / losses:      {} / {}",
        metrics.wins, metrics.losses
    );
    let _ = writeln!(out, "Win rate:           {:.1}%", metrics.win_rate);
    let _ = writeln!(out, "Gross profit:       {:.2}", metrics.gross_profit);
    let _ = writeln!(out, "Gross loss:         {:.2}", metrics.gross_loss);
    let _ = writeln!(out, "Net P&L:            {:.2}", metrics.net_pnl);
    let _ = writeln!(out, "Profit factor:      {}", profit_factor);
    let _ = writeln!(out, "Avg P&L per trade:  {:.2}", metrics.avg_pnl_per_trade);
    let _ = writeln!(out, "Trades per day:     {:.2}", metrics.trades_per_day);
    let _ = writeln!(out, "Max drawdown:       {:.2}%", metrics.max_drawdown);
    let _ = writeln!(
        out,
        "Max loss streak:    {}",
        metrics.max_consecutive_losses
    );
    let _ = writeln!(out, "Final balance:      {:.2}", metrics.final_balance);
    let _ = writeln!(out, "Return:             {:.2}%", metrics.return_pct);

    out
}

/// Render the closed-trade log as CSV.
pub fn render_trade_log(trades: &[Trade]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // Header errors can only come from the underlying Vec writer, which
    // cannot fail.
    let _ = writer.write_record([
        "entry_time",
        "exit_time",
        "side",
        "entry_price",
        "exit_price",
        "stop_loss",
        "take_profit",
        "lot_size",
        "exit_reason",
        "pnl",
        "commission",
        "slippage",
    ]);
    for trade in trades {
        let _ = writer.write_record([
            trade.entry_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            trade.exit_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            trade.side.to_string(),
            format!("{:.5}", trade.entry_price),
            format!("{:.5}", trade.exit_price),
            format!("{:.5}", trade.stop_loss),
            format!("{:.5}", trade.take_profit),
            format!("{:.2}", trade.lot_size),
            trade.exit_reason.to_string(),
            format!("{:.2}", trade.pnl),
            format!("{:.2}", trade.commission),
            format!("{:.5}", trade.slippage),
        ]);
    }
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_default(),
        Err(_) => String::new(),
    }
}

fn trade_log_path(output_path: &str) -> String {
    let path = Path::new(output_path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let file = format!("{}_trades.csv", stem);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(file).to_string_lossy().into_owned()
        }
        _ => file,
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        output_path: &str,
    ) -> Result<(), GoldtrendError> {
        fs::write(output_path, render_summary(result, metrics))?;
        fs::write(trade_log_path(output_path), render_trade_log(&result.trades))?;
        Ok(())
    }
}
