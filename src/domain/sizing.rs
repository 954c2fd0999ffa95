//! Risk-based position sizing.
//!
//! Converts a risk percentage of balance plus a stop distance into a
//! bounded, rounded lot size. Degenerate inputs (entry == stop) return the
//! floor size instead of failing: that is a configuration edge case, not
//! corrupted state.

/// Instrument scaling constants and lot bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingParams {
    /// Price move of one point (e.g. 0.01 for XAUUSD quoted in cents).
    pub point_size: f64,
    /// Monetary value of one point per 1.0 lot.
    pub value_per_point: f64,
    pub min_lot: f64,
    pub max_lot: f64,
    /// Decimal places the lot size is rounded to.
    pub lot_precision: u32,
}

impl Default for SizingParams {
    fn default() -> Self {
        SizingParams {
            point_size: 0.01,
            value_per_point: 1.0,
            min_lot: 0.01,
            max_lot: 0.05,
            lot_precision: 2,
        }
    }
}

/// Lot size risking `risk_pct` percent of `balance` between entry and stop.
///
/// stop_points = |entry - stop| / point_size
/// raw = balance * risk_pct/100 / (stop_points * value_per_point)
/// result = clamp(raw, min_lot, max_lot) rounded to lot_precision.
pub fn position_size(
    balance: f64,
    risk_pct: f64,
    entry_price: f64,
    stop_price: f64,
    params: &SizingParams,
) -> f64 {
    let stop_points = if params.point_size > 0.0 {
        (entry_price - stop_price).abs() / params.point_size
    } else {
        0.0
    };

    if stop_points <= 0.0 || params.value_per_point <= 0.0 {
        return params.min_lot;
    }

    let risk_amount = (balance * risk_pct / 100.0).max(0.0);
    let dollar_risk_per_lot = stop_points * params.value_per_point;
    let raw = risk_amount / dollar_risk_per_lot;

    let clamped = raw.clamp(params.min_lot, params.max_lot);
    let scale = 10_f64.powi(params.lot_precision.min(8) as i32);
    // Re-clamp after rounding: a coarse precision could otherwise round the
    // result outside the lot bounds.
    ((clamped * scale).round() / scale).clamp(params.min_lot, params.max_lot)
}
