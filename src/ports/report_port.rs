//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::GoldtrendError;
use crate::domain::metrics::Metrics;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        output_path: &str,
    ) -> Result<(), GoldtrendError>;
}
