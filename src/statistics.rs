//! Statistical transforms
//!
//! Rolling variance, standard deviation, covariance and beta, plus percentage
//! change. Windows are updated incrementally: each step removes the oldest
//! pair and adds the newest one to a running co-moment, so the cost is O(n)
//! regardless of the period.

use crate::common::{check_aligned, check_period, first_valid, nan_vec, safe_div, Warmup};
use crate::error::{IndicatorError, Result};

/// Default `normalize` for [`var`], [`std`] and [`cov`] (sample statistics).
pub const STAT_NORMALIZE: bool = true;

/// Default `normalize` for [`beta`] (population statistics).
pub const BETA_NORMALIZE: bool = false;

fn divisor(period: usize, normalize: bool) -> Result<f64> {
    check_period("period", period)?;
    if normalize {
        if period < 2 {
            tracing::debug!(period, "sample statistic needs two values");
            return Err(IndicatorError::parameter(
                "period",
                period,
                "must be at least 2 when normalize is set",
            ));
        }
        Ok((period - 1) as f64)
    } else {
        Ok(period as f64)
    }
}

/// Rolling sum of co-deviations `Σ (x - mean_x)(y - mean_y)` over each
/// trailing window.
///
/// Windows that contain a NaN are NaN. The first clean window after a NaN is
/// recomputed from scratch, later ones are slid.
fn rolling_comoment(x: &[f64], y: &[f64], period: usize) -> Vec<f64> {
    let n = x.len();
    let mut result = nan_vec(n);
    let start = first_valid(x).max(first_valid(y));
    if start + period > n {
        return result;
    }

    let p = period as f64;
    let mut nans = 0usize;
    let mut fresh = true;
    let (mut mx, mut my, mut c) = (0.0, 0.0, 0.0);

    for i in start..n {
        if x[i].is_nan() || y[i].is_nan() {
            nans += 1;
        }
        if i >= start + period {
            let j = i - period;
            if x[j].is_nan() || y[j].is_nan() {
                nans -= 1;
            }
        }
        if i + 1 < start + period {
            continue;
        }
        if nans > 0 {
            fresh = true;
            continue;
        }

        if fresh {
            let lo = i + 1 - period;
            mx = x[lo..=i].iter().sum::<f64>() / p;
            my = y[lo..=i].iter().sum::<f64>() / p;
            c = x[lo..=i]
                .iter()
                .zip(&y[lo..=i])
                .map(|(a, b)| (a - mx) * (b - my))
                .sum();
            fresh = false;
        } else {
            let (xo, yo, xn, yn) = (x[i - period], y[i - period], x[i], y[i]);
            let dx = xn - xo;
            let dy = yn - yo;
            let new_mx = mx + dx / p;
            let new_my = my + dy / p;
            c += dx * (yn - new_my) + dy * (xo - mx);
            mx = new_mx;
            my = new_my;
        }
        result[i] = c;
    }
    result
}

/// Rolling variance
///
/// Divisor is `period - 1` when `normalize` is set, `period` otherwise.
/// Tiny negative results from rounding are clamped to zero.
///
/// # Errors
/// `InvalidParameter` for a zero period, or `period < 2` with `normalize`.
pub fn var(values: &[f64], period: usize, normalize: bool) -> Result<Vec<f64>> {
    let d = divisor(period, normalize)?;
    Ok(rolling_comoment(values, values, period)
        .into_iter()
        .map(|c| if c.is_nan() { c } else { (c / d).max(0.0) })
        .collect())
}

/// Rolling standard deviation, the square root of [`var`].
pub fn std(values: &[f64], period: usize, normalize: bool) -> Result<Vec<f64>> {
    Ok(var(values, period, normalize)?
        .into_iter()
        .map(f64::sqrt)
        .collect())
}

/// Rolling covariance of two aligned series, same divisor convention as [`var`].
pub fn cov(values: &[f64], market: &[f64], period: usize, normalize: bool) -> Result<Vec<f64>> {
    check_aligned(values, &[("market", market)])?;
    let d = divisor(period, normalize)?;
    Ok(rolling_comoment(values, market, period)
        .into_iter()
        .map(|c| c / d)
        .collect())
}

/// Rolling beta: `cov(values, market) / var(market)`.
///
/// NaN where the market variance is zero. Usually called with
/// [`BETA_NORMALIZE`].
pub fn beta(values: &[f64], market: &[f64], period: usize, normalize: bool) -> Result<Vec<f64>> {
    let covariance = cov(values, market, period, normalize)?;
    let variance = var(market, period, normalize)?;
    Ok(covariance
        .iter()
        .zip(&variance)
        .map(|(&c, &v)| safe_div(c, v))
        .collect())
}

/// Percentage change over `period` steps: `(p[i] - p[i-period]) / p[i-period]`.
///
/// Undefined for the first `period` values and wherever the base is zero.
pub fn pct_change(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let n = values.len();
    let mut result = nan_vec(n);
    for i in Warmup::lag(period).len()..n {
        let base = values[i - period];
        result[i] = safe_div(values[i] - base, base);
    }
    Ok(result)
}
