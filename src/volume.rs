//! Volume indicators
//!
//! Indicators that incorporate trading volume to analyze price movements.

use crate::common::{check_aligned, check_period, safe_div};
use crate::error::Result;
use crate::moving_averages::ema;
use crate::window::{rolling, Reduction};

/// Default Chaikin Money Flow period.
pub const CMF_PERIOD: usize = 21;
/// Fast EMA of the Chaikin Oscillator.
pub const CI_FAST: usize = 3;
/// Slow EMA of the Chaikin Oscillator.
pub const CI_SLOW: usize = 10;
/// Starting level of PVI and NVI.
pub const VOLUME_INDEX_BASE: f64 = 100.0;

/// Close location value × volume. Zero when the bar has no range.
#[inline]
fn money_flow_volume(close: f64, high: f64, low: f64, volume: f64) -> f64 {
    let range = high - low;
    if range > 0.0 {
        ((close - low) - (high - close)) / range * volume
    } else if range.is_nan() {
        f64::NAN
    } else {
        0.0
    }
}

/// ACDI - Accumulation/Distribution
///
/// Running total of [close location value](money_flow_volume) × volume.
/// Bars without range add nothing.
pub fn acdi(close: &[f64], high: &[f64], low: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("high", high), ("low", low), ("volume", volume)])?;
    let mut total = 0.0;
    Ok((0..n)
        .map(|i| {
            total += money_flow_volume(close[i], high[i], low[i], volume[i]);
            total
        })
        .collect())
}

/// OBV - On Balance Volume
///
/// Cumulative volume indicator that adds volume on up days and subtracts on down days
///
/// Formula:
/// - OBV[0] = Volume[0]
/// - If Close > Close[1]: OBV = OBV[1] + Volume
/// - If Close < Close[1]: OBV = OBV[1] - Volume
/// - If Close = Close[1]: OBV = OBV[1]
pub fn obv(close: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("volume", volume)])?;
    if n == 0 {
        return Ok(vec![]);
    }

    let mut result = vec![0.0; n];
    result[0] = volume[0];

    for i in 1..n {
        if close[i] > close[i - 1] {
            result[i] = result[i - 1] + volume[i];
        } else if close[i] < close[i - 1] {
            result[i] = result[i - 1] - volume[i];
        } else {
            result[i] = result[i - 1];
        }
    }
    Ok(result)
}

/// CMF - Chaikin Money Flow
///
/// Sum of money flow volume over the last `period` bars divided by the sum
/// of volume over the same bars. NaN when that volume is zero.
pub fn cmf(close: &[f64], high: &[f64], low: &[f64], volume: &[f64], period: usize) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("high", high), ("low", low), ("volume", volume)])?;
    check_period("period", period)?;
    let flow: Vec<f64> = (0..n)
        .map(|i| money_flow_volume(close[i], high[i], low[i], volume[i]))
        .collect();
    let flow_sum = rolling(&flow, period, Reduction::Sum)?;
    let volume_sum = rolling(volume, period, Reduction::Sum)?;
    Ok(flow_sum
        .iter()
        .zip(&volume_sum)
        .map(|(&f, &v)| safe_div(f, v))
        .collect())
}

/// CI - Chaikin Oscillator: `EMA(ACDI, 3) - EMA(ACDI, 10)`.
pub fn ci(close: &[f64], high: &[f64], low: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    let ad = acdi(close, high, low, volume)?;
    let fast = ema(&ad, CI_FAST)?;
    let slow = ema(&ad, CI_SLOW)?;
    Ok(fast.iter().zip(&slow).map(|(f, s)| f - s).collect())
}

/// Shared walk of PVI and NVI: the index moves by the close's percentage
/// change on bars where `active(volume, previous volume)` holds.
fn volume_index(close: &[f64], volume: &[f64], active: fn(f64, f64) -> bool) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("volume", volume)])?;
    let mut result = Vec::with_capacity(n);
    let mut level = VOLUME_INDEX_BASE;
    for i in 0..n {
        if i > 0 && active(volume[i], volume[i - 1]) && close[i - 1] != 0.0 {
            level += (close[i] - close[i - 1]) / close[i - 1] * level;
        }
        result.push(level);
    }
    Ok(result)
}

/// PVI - Positive Volume Index
///
/// Starts at 100 and follows the close only on bars where volume rose.
pub fn pvi(close: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    volume_index(close, volume, |now, before| now > before)
}

/// NVI - Negative Volume Index
///
/// Starts at 100 and follows the close only on bars where volume fell.
pub fn nvi(close: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    volume_index(close, volume, |now, before| now < before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    // ===== ACDI Tests =====

    #[test]
    fn test_acdi_accumulates() {
        let close = [9.0, 10.0, 5.0];
        let high = [10.0, 10.0, 5.0];
        let low = [8.0, 8.0, 5.0];
        let volume = [100.0, 50.0, 70.0];
        let result = acdi(&close, &high, &low, &volume).unwrap();
        // mid-range close contributes nothing, top-of-range close adds full volume
        assert!(approx_eq(result[0], 0.0, 1e-12));
        assert!(approx_eq(result[1], 50.0, 1e-12));
        // zero range
        assert!(approx_eq(result[2], 50.0, 1e-12));
    }

    // ===== OBV Tests =====

    #[test]
    fn test_obv_uptrend() {
        let closes = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        let volumes = vec![100.0, 100.0, 100.0, 100.0, 100.0];

        let result = obv(&closes, &volumes).unwrap();

        // Each bar adds volume (price going up)
        assert!(approx_eq(result[0], 100.0, 0.001));
        assert!(approx_eq(result[1], 200.0, 0.001));
        assert!(approx_eq(result[4], 500.0, 0.001));
    }

    #[test]
    fn test_obv_mixed() {
        let closes = vec![14.0, 13.0, 13.0, 15.0];
        let volumes = vec![100.0, 40.0, 70.0, 10.0];
        let result = obv(&closes, &volumes).unwrap();
        assert_eq!(result, vec![100.0, 60.0, 60.0, 70.0]);
    }

    #[test]
    fn test_obv_rejects_misaligned() {
        assert_eq!(
            obv(&[1.0, 2.0], &[1.0]),
            Err(IndicatorError::shape("volume", 2, 1))
        );
    }

    // ===== CMF Tests =====

    #[test]
    fn test_cmf() {
        let close = [10.0, 8.0, 9.0];
        let high = [10.0, 10.0, 10.0];
        let low = [8.0, 8.0, 8.0];
        let volume = [100.0, 100.0, 200.0];
        let result = cmf(&close, &high, &low, &volume, 2).unwrap();
        assert!(result[0].is_nan());
        // +100 and -100
        assert!(approx_eq(result[1], 0.0, 1e-12));
        // -100 and 0 over 300
        assert!(approx_eq(result[2], -100.0 / 300.0, 1e-12));
    }

    #[test]
    fn test_cmf_zero_volume_is_nan() {
        let bars = [1.0, 2.0, 3.0];
        let result = cmf(&bars, &bars, &bars, &[0.0; 3], 2).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
    }

    // ===== CI Tests =====

    #[test]
    fn test_ci_warmup_follows_slow_ema() {
        let close: Vec<f64> = (0..20).map(|i| 10.0 + (i % 4) as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 2.0).collect();
        let volume = vec![1000.0; 20];
        let result = ci(&close, &high, &low, &volume).unwrap();
        assert!(result[8].is_nan());
        assert!(!result[9].is_nan());
    }

    // ===== PVI / NVI Tests =====

    #[test]
    fn test_pvi_nvi() {
        let close = [10.0, 11.0, 12.1, 6.05];
        let volume = [100.0, 200.0, 150.0, 300.0];
        let p = pvi(&close, &volume).unwrap();
        let n = nvi(&close, &volume).unwrap();
        assert_eq!(p[0], 100.0);
        assert_eq!(n[0], 100.0);
        // volume up: +10%, down: skip, up: -50%
        assert!(approx_eq(p[1], 110.0, 1e-9));
        assert!(approx_eq(p[2], 110.0, 1e-9));
        assert!(approx_eq(p[3], 55.0, 1e-9));
        // only bar 2 had falling volume: +10%
        assert!(approx_eq(n[1], 100.0, 1e-9));
        assert!(approx_eq(n[2], 110.0, 1e-9));
        assert!(approx_eq(n[3], 110.0, 1e-9));
    }

    #[test]
    fn test_volume_empty_input() {
        assert!(acdi(&[], &[], &[], &[]).unwrap().is_empty());
        assert!(obv(&[], &[]).unwrap().is_empty());
        assert!(cmf(&[], &[], &[], &[], CMF_PERIOD).unwrap().is_empty());
        assert!(pvi(&[], &[]).unwrap().is_empty());
    }
}
