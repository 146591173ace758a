//! Volatility indicators
//!
//! Indicators that measure the degree of price variation over time.

use crate::common::{check_aligned, check_non_negative, check_period, nan_vec, safe_div, Warmup};
use crate::error::Result;
use crate::moving_averages::{ema, sma, smma};
use crate::statistics::{std, STAT_NORMALIZE};

/// Upper, middle and lower band, in that order.
pub type Bands = (Vec<f64>, Vec<f64>, Vec<f64>);

/// Default Bollinger/Keltner band width multiplier.
pub const BAND_DEVIATION: f64 = 2.0;
/// Default Keltner EMA period.
pub const KC_PERIOD: usize = 20;
/// Default Keltner ATR period.
pub const KC_PERIOD_ATR: usize = 20;
/// Default Chaikin Volatility rate-of-change period.
pub const CV_PERIOD: usize = 10;
/// Default Chaikin Volatility smoothing period.
pub const CV_SMOOTHING_PERIOD: usize = 10;

/// True Range
///
/// The greatest of:
/// - Current High - Current Low
/// - |Current High - Previous Close|
/// - |Current Low - Previous Close|
///
/// The first value is NaN since it has no previous close.
pub fn true_range(close: &[f64], high: &[f64], low: &[f64]) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("high", high), ("low", low)])?;
    let mut result = nan_vec(n);

    for i in 1..n {
        let h_l = high[i] - low[i];
        let h_c = (high[i] - close[i - 1]).abs();
        let l_c = (low[i] - close[i - 1]).abs();
        result[i] = h_l.max(h_c).max(l_c);
    }
    Ok(result)
}

/// ATR - Average True Range
///
/// Wilder smoothing ([`smma`]) of the true range. The first value is the mean
/// of `TR[1..=period]`, at index `period`.
pub fn atr(close: &[f64], high: &[f64], low: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    smma(&true_range(close, high, low)?, period)
}

/// Bollinger Bands with a sample standard deviation.
///
/// middle = SMA(period), upper/lower = middle ± deviation × STD(period).
///
/// # Example
/// ```
/// use candlekit::bbands;
/// let (upper, middle, lower) = bbands(&[1.0, 2.0, 3.0, 4.0, 5.0], 5, 2.0).unwrap();
/// assert_eq!(middle[4], 3.0);
/// assert!((upper[4] - middle[4] - 2.0 * 2.5_f64.sqrt()).abs() < 1e-12);
/// assert!(lower[3].is_nan());
/// ```
pub fn bbands(values: &[f64], period: usize, deviation: f64) -> Result<Bands> {
    bbands_with(values, period, deviation, STAT_NORMALIZE)
}

/// Bollinger Bands with an explicit standard deviation divisor.
///
/// `normalize = false` gives the population deviation used by most charting
/// packages.
pub fn bbands_with(values: &[f64], period: usize, deviation: f64, normalize: bool) -> Result<Bands> {
    check_non_negative("deviation", deviation)?;
    let middle = sma(values, period)?;
    let spread = std(values, period, normalize)?;
    Ok(bands_around(middle, &spread, deviation))
}

/// Keltner Channels
///
/// middle = EMA(close, period), upper/lower = middle ± deviation × ATR(period_atr).
/// Undefined until both the EMA and the ATR are.
pub fn kc(
    close: &[f64],
    high: &[f64],
    low: &[f64],
    period: usize,
    period_atr: usize,
    deviation: f64,
) -> Result<Bands> {
    check_period("period", period)?;
    check_period("period_atr", period_atr)?;
    check_non_negative("deviation", deviation)?;
    let range = atr(close, high, low, period_atr)?;
    let mut middle = ema(close, period)?;
    Warmup::window(period)
        .alongside(Warmup::lag(period_atr))
        .mask(&mut middle);
    Ok(bands_around(middle, &range, deviation))
}

fn bands_around(middle: Vec<f64>, spread: &[f64], deviation: f64) -> Bands {
    let upper = middle
        .iter()
        .zip(spread)
        .map(|(m, s)| m + deviation * s)
        .collect();
    let lower = middle
        .iter()
        .zip(spread)
        .map(|(m, s)| m - deviation * s)
        .collect();
    (upper, middle, lower)
}

/// Chaikin Volatility
///
/// Percentage change over `period` steps of EMA(high - low, smoothing_period):
/// `100 × (E[i] - E[i - period]) / E[i - period]`. NaN where the base EMA is
/// zero.
///
/// `smoothing_period` sets the EMA span and `period` the lag. The other
/// common reading (EMA span `period`, lag `smoothing_period - 1`) gives
/// different values unless the two periods are chosen to match.
pub fn cv(high: &[f64], low: &[f64], period: usize, smoothing_period: usize) -> Result<Vec<f64>> {
    check_aligned(high, &[("low", low)])?;
    check_period("period", period)?;
    check_period("smoothing_period", smoothing_period)?;

    let spread: Vec<f64> = high.iter().zip(low).map(|(h, l)| h - l).collect();
    let smoothed = ema(&spread, smoothing_period)?;
    let n = smoothed.len();
    let mut result = nan_vec(n);
    for i in period..n {
        let base = smoothed[i - period];
        result[i] = safe_div(smoothed[i] - base, base) * 100.0;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use approx::assert_relative_eq;

    fn sample_bars() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close = vec![10.0, 10.5, 10.2, 10.8, 11.0, 10.7, 11.2, 11.5, 11.1, 11.6, 12.0, 11.8];
        let high: Vec<f64> = close.iter().map(|c| c + 0.4).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.3).collect();
        (close, high, low)
    }

    // ===== True Range / ATR Tests =====

    #[test]
    fn test_true_range() {
        let close = [10.0, 12.0, 9.0];
        let high = [11.0, 12.5, 10.0];
        let low = [9.0, 11.0, 8.5];
        let tr = true_range(&close, &high, &low).unwrap();
        assert!(tr[0].is_nan());
        assert_relative_eq!(tr[1], 2.5); // |12.5 - 10|
        assert_relative_eq!(tr[2], 3.5); // |8.5 - 12|
    }

    #[test]
    fn test_atr_first_value_is_mean_tr() {
        let (close, high, low) = sample_bars();
        let tr = true_range(&close, &high, &low).unwrap();
        let result = atr(&close, &high, &low, 4).unwrap();
        assert!(result[3].is_nan());
        let expected = tr[1..=4].iter().sum::<f64>() / 4.0;
        assert_relative_eq!(result[4], expected);
        assert_relative_eq!(result[5], (expected * 3.0 + tr[5]) / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_atr_rejects_misaligned() {
        assert_eq!(
            atr(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1),
            Err(IndicatorError::shape("high", 2, 1))
        );
    }

    // ===== Bollinger Tests =====

    #[test]
    fn test_bbands_symmetric() {
        let (close, _, _) = sample_bars();
        let (upper, middle, lower) = bbands(&close, 5, 2.0).unwrap();
        for i in 0..4 {
            assert!(upper[i].is_nan() && middle[i].is_nan() && lower[i].is_nan());
        }
        for i in 4..close.len() {
            assert_relative_eq!(upper[i] - middle[i], middle[i] - lower[i], epsilon = 1e-12);
            assert!(upper[i] > lower[i]);
        }
    }

    #[test]
    fn test_bbands_population_narrower() {
        let (close, _, _) = sample_bars();
        let (sample_upper, _, _) = bbands(&close, 5, 2.0).unwrap();
        let (pop_upper, _, _) = bbands_with(&close, 5, 2.0, false).unwrap();
        assert!(pop_upper[6] < sample_upper[6]);
    }

    #[test]
    fn test_bbands_rejects_bad_deviation() {
        assert!(bbands(&[1.0, 2.0, 3.0], 2, -1.0).is_err());
        assert!(bbands(&[1.0, 2.0, 3.0], 2, f64::NAN).is_err());
        assert!(bbands(&[1.0, 2.0, 3.0], 1, 2.0).is_err());
    }

    // ===== Keltner Tests =====

    #[test]
    fn test_kc_bands() {
        let (close, high, low) = sample_bars();
        let (upper, middle, lower) = kc(&close, &high, &low, 3, 5, 1.5).unwrap();
        let ema3 = ema(&close, 3).unwrap();
        let atr5 = atr(&close, &high, &low, 5).unwrap();
        // ATR(5) defines the prefix
        for i in 0..5 {
            assert!(upper[i].is_nan() && middle[i].is_nan() && lower[i].is_nan());
        }
        for i in 5..close.len() {
            assert_relative_eq!(middle[i], ema3[i]);
            assert_relative_eq!(upper[i], ema3[i] + 1.5 * atr5[i]);
            assert_relative_eq!(lower[i], ema3[i] - 1.5 * atr5[i]);
        }
    }

    // ===== Chaikin Volatility Tests =====

    #[test]
    fn test_cv_constant_range_is_zero() {
        let high = vec![5.0; 12];
        let low = vec![4.0; 12];
        let result = cv(&high, &low, 3, 4).unwrap();
        assert!(result[5].is_nan());
        for value in &result[6..] {
            assert_relative_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_cv_widening_range() {
        let high: Vec<f64> = (0..15).map(|i| 10.0 + i as f64 * 0.2).collect();
        let low = vec![9.0; 15];
        let result = cv(&high, &low, CV_PERIOD.min(3), 2).unwrap();
        assert!(result[14] > 0.0);
    }

    #[test]
    fn test_cv_smoothing_sets_span_and_period_sets_lag() {
        let high = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let low = [0.0; 6];
        // EMA(3) of the range: NaN, NaN, 2, 3, 4, 5
        let result = cv(&high, &low, 1, 3).unwrap();
        assert!(result[2].is_nan());
        assert_relative_eq!(result[3], 50.0, epsilon = 1e-9);
        assert_relative_eq!(result[4], 100.0 / 3.0, epsilon = 1e-9);
        // swapped roles: raw range lagged by 3
        let swapped = cv(&high, &low, 3, 1).unwrap();
        assert_relative_eq!(swapped[3], 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_volatility_empty_input() {
        assert!(true_range(&[], &[], &[]).unwrap().is_empty());
        assert!(atr(&[], &[], &[], 14).unwrap().is_empty());
        let (upper, _, _) = bbands(&[], 20, BAND_DEVIATION).unwrap();
        assert!(upper.is_empty());
        assert!(cv(&[], &[], CV_PERIOD, CV_SMOOTHING_PERIOD).unwrap().is_empty());
    }
}
