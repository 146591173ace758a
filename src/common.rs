//! Common utilities shared across indicator modules
//!
//! Validation helpers live here so every transform rejects bad input the same
//! way, along with [`Warmup`], the single place where undefined-prefix lengths
//! are computed.

use crate::error::{IndicatorError, Result};

/// Initialize a result vector with NaN values
#[inline]
pub fn nan_vec(len: usize) -> Vec<f64> {
    vec![f64::NAN; len]
}

/// Safe division that returns NaN on divide by zero
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Index of the first non-NaN value, or `values.len()` if there is none.
#[inline]
pub fn first_valid(values: &[f64]) -> usize {
    values
        .iter()
        .position(|v| !v.is_nan())
        .unwrap_or(values.len())
}

/// Compute pairwise differences (like np.diff)
pub fn diff(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return vec![];
    }
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Step changes aligned with the input: `out[i] = values[i] - values[i-1]`,
/// with `out[0]` NaN.
pub fn changes(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(f64::NAN);
    out.extend(diff(values));
    out
}

/// Separate gains and losses from price changes. NaN changes stay NaN.
pub fn gains_losses(changes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let gains: Vec<f64> = changes
        .iter()
        .map(|&c| if c > 0.0 { c } else if c.is_nan() { c } else { 0.0 })
        .collect();
    let losses: Vec<f64> = changes
        .iter()
        .map(|&c| if c < 0.0 { -c } else if c.is_nan() { c } else { 0.0 })
        .collect();
    (gains, losses)
}

/// Reject a zero lookback.
pub fn check_period(name: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        tracing::debug!(parameter = name, period, "rejected lookback");
        return Err(IndicatorError::parameter(
            name,
            period,
            "must be greater than zero",
        ));
    }
    Ok(())
}

/// Reject a NaN or infinite scalar parameter.
pub fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        tracing::debug!(parameter = name, value, "rejected non-finite parameter");
        return Err(IndicatorError::parameter(name, value, "must be finite"));
    }
    Ok(())
}

/// Reject a negative, NaN or infinite scalar parameter.
pub fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if value < 0.0 {
        tracing::debug!(parameter = name, value, "rejected negative parameter");
        return Err(IndicatorError::parameter(name, value, "must be >= 0"));
    }
    Ok(())
}

/// Check that every named series has the same length as `reference`.
///
/// Returns the shared length.
pub fn check_aligned(reference: &[f64], others: &[(&'static str, &[f64])]) -> Result<usize> {
    let n = reference.len();
    for (name, series) in others {
        if series.len() != n {
            tracing::debug!(series = name, expected = n, actual = series.len(), "misaligned input");
            return Err(IndicatorError::shape(name, n, series.len()));
        }
    }
    Ok(n)
}

/// Length of the undefined prefix a transform produces.
///
/// Simple windows of period `p` need `p - 1` earlier values, lagged
/// differences need `p`. Stages applied in sequence add their warm-ups,
/// stages computed side by side take the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Warmup(usize);

impl Warmup {
    /// Pointwise transforms.
    pub const NONE: Warmup = Warmup(0);

    /// Trailing window of `period` values.
    #[inline]
    pub const fn window(period: usize) -> Self {
        Warmup(period.saturating_sub(1))
    }

    /// Comparison against the value `period` steps back.
    #[inline]
    pub const fn lag(period: usize) -> Self {
        Warmup(period)
    }

    /// A stage fed with the output of `self`.
    #[inline]
    pub const fn then(self, next: Warmup) -> Self {
        Warmup(self.0 + next.0)
    }

    /// `depth` identical stages in sequence.
    #[inline]
    pub const fn repeat(self, depth: usize) -> Self {
        Warmup(self.0 * depth)
    }

    /// Two stages computed from the same input and then combined.
    #[inline]
    pub fn alongside(self, other: Warmup) -> Self {
        self.max(other)
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Overwrite the undefined prefix of `out` with NaN.
    pub fn mask(self, out: &mut [f64]) {
        let end = self.0.min(out.len());
        out[..end].iter_mut().for_each(|v| *v = f64::NAN);
    }
}
