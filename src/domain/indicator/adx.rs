//! ADX (Average Directional Index) with +DI / -DI.
//!
//! Directional movement at bar i:
//!   up   = high[i] - high[i-1], down = low[i-1] - low[i]
//!   +DM  = up   if up > down and up > 0, else 0
//!   -DM  = down if down > up and down > 0, else 0
//!
//! +DM, -DM and TR are Wilder-smoothed (alpha = 1/period, seeded with the
//! first value). +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise.
//! DX = 100 * |+DI - -DI| / (+DI + -DI), with a zero denominator yielding 0
//! rather than an error; ADX is the Wilder smoothing of DX.
//!
//! The first bar has no directional movement and reports all zeros.

use crate::domain::bar::Bar;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdxPoint {
    pub plus_di: f64,
    pub minus_di: f64,
    pub adx: f64,
}

pub fn calculate_adx(bars: &[Bar], period: usize) -> Vec<AdxPoint> {
    let mut out = vec![AdxPoint::default(); bars.len()];
    if period == 0 || bars.len() < 2 {
        return out;
    }

    let p = period as f64;
    let mut sm_plus = 0.0;
    let mut sm_minus = 0.0;
    let mut sm_tr = 0.0;
    let mut adx = 0.0;

    for i in 1..bars.len() {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = bars[i].true_range(bars[i - 1].close);

        if i == 1 {
            sm_plus = plus_dm;
            sm_minus = minus_dm;
            sm_tr = tr;
        } else {
            sm_plus = (sm_plus * (p - 1.0) + plus_dm) / p;
            sm_minus = (sm_minus * (p - 1.0) + minus_dm) / p;
            sm_tr = (sm_tr * (p - 1.0) + tr) / p;
        }

        let (plus_di, minus_di) = if sm_tr > 0.0 {
            (100.0 * sm_plus / sm_tr, 100.0 * sm_minus / sm_tr)
        } else {
            (0.0, 0.0)
        };

        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        };

        adx = if i == 1 {
            dx
        } else {
            (adx * (p - 1.0) + dx) / p
        };

        out[i] = AdxPoint {
            plus_di,
            minus_di,
            adx,
        };
    }

    out
}
