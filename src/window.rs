//! Windowed reductions
//!
//! Sliding-window sum, mean, min, max and weighted sum over a trailing window
//! of `period` values. Output `i` is defined once the window ending at `i`
//! holds `period` values, so the first `period - 1` outputs are NaN.
//!
//! Leading NaNs are skipped: the first window starts at the first defined
//! input, which lets cascaded transforms feed each other directly. A NaN
//! inside a later window makes that window's output NaN.
//!
//! Sum and mean keep a running accumulator. Min and max keep a monotonic
//! deque of indices. Evenly spaced weights keep a running ramp sum.

use std::collections::VecDeque;

use crate::common::{check_finite, check_period, first_valid, nan_vec};
use crate::error::{IndicatorError, Result};

/// Reduction applied to each trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
    Min,
    Max,
}

/// Reduce every trailing window of `period` values.
///
/// # Example
/// ```
/// use candlekit::window::{rolling, Reduction};
/// let out = rolling(&[1.0, 2.0, 3.0, 4.0], 2, Reduction::Max).unwrap();
/// assert!(out[0].is_nan());
/// assert_eq!(&out[1..], &[2.0, 3.0, 4.0]);
/// ```
pub fn rolling(values: &[f64], period: usize, reduction: Reduction) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let n = values.len();
    let mut result = nan_vec(n);

    match reduction {
        Reduction::Sum => running_sum(values, period, 1.0, &mut result),
        Reduction::Mean => running_sum(values, period, period as f64, &mut result),
        Reduction::Min | Reduction::Max => {
            let positions = extreme_positions(values, period, reduction == Reduction::Max);
            for (out, pos) in result.iter_mut().zip(positions) {
                if let Some(j) = pos {
                    *out = values[j];
                }
            }
        }
    }

    Ok(result)
}

/// Index of the largest value in each trailing window.
///
/// Ties resolve to the earliest index. `None` where the window is
/// incomplete or contains NaN.
pub fn rolling_argmax(values: &[f64], period: usize) -> Result<Vec<Option<usize>>> {
    check_period("period", period)?;
    Ok(extreme_positions(values, period, true))
}

/// Index of the smallest value in each trailing window.
///
/// Ties resolve to the earliest index. `None` where the window is
/// incomplete or contains NaN.
pub fn rolling_argmin(values: &[f64], period: usize) -> Result<Vec<Option<usize>>> {
    check_period("period", period)?;
    Ok(extreme_positions(values, period, false))
}

/// Weighted sum of each trailing window.
///
/// `weights[0]` applies to the oldest value of the window and
/// `weights[period - 1]` to the newest, where `period = weights.len()`.
/// Evenly spaced weights (such as the LWMA ramp) slide in O(n); any other
/// weighting recomputes each window.
pub fn rolling_weighted_sum(values: &[f64], weights: &[f64]) -> Result<Vec<f64>> {
    let period = weights.len();
    if period == 0 {
        return Err(IndicatorError::parameter(
            "weights",
            "[]",
            "must contain at least one weight",
        ));
    }
    for &w in weights {
        check_finite("weights", w)?;
    }

    let n = values.len();
    let mut result = nan_vec(n);
    let start = first_valid(values);
    if start + period > n {
        return Ok(result);
    }

    match arithmetic_step(weights) {
        Some(step) => ramp_sum(values, start, period, weights[0] - step, step, &mut result),
        None => {
            for i in (start + period - 1)..n {
                let window = &values[(i + 1 - period)..=i];
                result[i] = window.iter().zip(weights).map(|(v, w)| v * w).sum();
            }
        }
    }
    Ok(result)
}

/// Common difference of `weights` when they form an arithmetic progression.
fn arithmetic_step(weights: &[f64]) -> Option<f64> {
    let step = match weights {
        [first, second, ..] => second - first,
        _ => 0.0,
    };
    let tolerance = weights.iter().fold(0.0f64, |m, w| m.max(w.abs())) * 1e-12;
    weights
        .windows(2)
        .all(|pair| (pair[1] - pair[0] - step).abs() <= tolerance)
        .then_some(step)
}

/// Weighted sum with weights `offset + step * k`, `k = 1..=period` from the
/// oldest value. O(n): the ramp-weighted sum slides as
/// `ramp + period * new - plain`.
fn ramp_sum(values: &[f64], start: usize, period: usize, offset: f64, step: f64, out: &mut [f64]) {
    // plain and ramp-weighted sums of the values since the last NaN
    let mut plain = 0.0;
    let mut ramp = 0.0;
    let mut count = 0usize;
    for (i, &v) in values.iter().enumerate().skip(start) {
        if v.is_nan() {
            plain = 0.0;
            ramp = 0.0;
            count = 0;
            continue;
        }
        if count < period {
            count += 1;
            ramp += count as f64 * v;
            plain += v;
        } else {
            ramp += period as f64 * v - plain;
            plain += v - values[i - period];
        }
        if count == period {
            out[i] = offset * plain + step * ramp;
        }
    }
}

fn running_sum(values: &[f64], period: usize, divisor: f64, out: &mut [f64]) {
    let n = values.len();
    let start = first_valid(values);
    if start + period > n {
        return;
    }

    // NaNs are kept out of the accumulator and counted instead
    let mut sum = 0.0;
    let mut nans = 0usize;
    for (i, &v) in values.iter().enumerate().skip(start) {
        if v.is_nan() {
            nans += 1;
        } else {
            sum += v;
        }
        if i >= start + period {
            let old = values[i - period];
            if old.is_nan() {
                nans -= 1;
            } else {
                sum -= old;
            }
        }
        if i + 1 >= start + period {
            out[i] = if nans == 0 { sum / divisor } else { f64::NAN };
        }
    }
}

fn extreme_positions(values: &[f64], period: usize, want_max: bool) -> Vec<Option<usize>> {
    let n = values.len();
    let mut result = vec![None; n];
    let start = first_valid(values);
    if start + period > n {
        return result;
    }

    // Indices whose values are monotonic from the front (the extreme) to the back
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut last_nan: Option<usize> = None;

    for i in start..n {
        let v = values[i];
        if v.is_nan() {
            last_nan = Some(i);
        } else {
            while let Some(&back) = deque.back() {
                // strict, so an equal earlier value keeps the front
                let dominated = if want_max {
                    v > values[back]
                } else {
                    v < values[back]
                };
                if !dominated {
                    break;
                }
                deque.pop_back();
            }
            deque.push_back(i);
        }

        while let Some(&front) = deque.front() {
            if front + period <= i {
                deque.pop_front();
            } else {
                break;
            }
        }

        let complete = i + 1 >= start + period;
        let clean = last_nan.map_or(true, |j| j + period <= i);
        if complete && clean {
            result[i] = deque.front().copied();
        }
    }
    result
}
