//! Moving Average Indicators
//!
//! This module provides the trend family:
//! - SMA: Simple Moving Average
//! - EMA: Exponential Moving Average
//! - DEMA / TEMA / T3: cascaded EMAs
//! - TMA: Triangular Moving Average (SMA of an SMA)
//! - SMMA: Smoothed Moving Average (Wilder's smoothing)
//! - LWMA: Linearly Weighted Moving Average
//! - WC: Weighted Close
//!
//! Every average skips a leading run of NaNs, so the output of one average can
//! be fed straight into another and the undefined prefixes add up.

use crate::common::{check_aligned, check_non_negative, check_period, nan_vec, Warmup};
use crate::error::Result;
use crate::options::MaType;
use crate::window::{rolling, rolling_weighted_sum, Reduction};

/// Default T3 volume factor.
pub const T3_VOLUME_FACTOR: f64 = 0.7;

/// Simple Moving Average (SMA)
///
/// The arithmetic mean of the last `period` values.
///
/// # Formula
/// SMA = (P1 + P2 + ... + Pn) / n
///
/// # Arguments
/// * `values` - Price or indicator values
/// * `period` - Number of periods to average
///
/// # Returns
/// Vector of same length as input, with NaN for first `period - 1` values
///
/// # Example
/// ```
/// use candlekit::sma;
/// let prices = vec![2.0, 4.0, 6.0, 8.0, 10.0];
/// let result = sma(&prices, 3).unwrap();
/// assert_eq!(result[2], 4.0);  // (2+4+6)/3
/// assert_eq!(result[4], 8.0);  // (6+8+10)/3
/// ```
pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>> {
    rolling(values, period, Reduction::Mean)
}

/// Exponential Moving Average (EMA)
///
/// Gives more weight to recent prices using exponential decay.
///
/// # Formula
/// Multiplier = 2 / (period + 1)
/// EMA = (Price - Previous EMA) × Multiplier + Previous EMA
///
/// Seeded with the SMA of the first `period` values.
///
/// # Returns
/// Vector of same length as input, with NaN for first `period - 1` values
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut stages = ema_cascade(values, period, 1)?;
    Ok(stages.pop().unwrap_or_default())
}

/// Run `depth` EMAs in cascade, each fed by the previous one, in a single
/// forward pass.
///
/// Returns one series per stage: `stages[0]` is EMA(values),
/// `stages[1]` is EMA(EMA(values)) and so on. On fully defined input stage
/// `k` (1-based) has an undefined prefix of `k * (period - 1)`.
pub fn ema_cascade(values: &[f64], period: usize, depth: usize) -> Result<Vec<Vec<f64>>> {
    check_period("period", period)?;
    tracing::trace!(len = values.len(), period, depth, "ema cascade");
    let alpha = 2.0 / (period as f64 + 1.0);
    Ok(smooth_cascade(values, period, alpha, depth))
}

/// Seeded exponential smoother, one per cascade stage.
#[derive(Debug, Clone)]
struct Stage {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: f64,
}

impl Stage {
    fn new(period: usize, alpha: f64) -> Self {
        Self {
            period,
            alpha,
            seed_sum: 0.0,
            seen: 0,
            value: f64::NAN,
        }
    }

    /// Feed one input, return this stage's output for it.
    ///
    /// A NaN before the seed completes restarts the seed, so the seed mean
    /// only covers consecutive values. After seeding a NaN is passed through
    /// and the smoothed value carries over it.
    #[inline]
    fn update(&mut self, x: f64) -> f64 {
        if x.is_nan() {
            if self.seen < self.period {
                self.seed_sum = 0.0;
                self.seen = 0;
            }
            return f64::NAN;
        }
        if self.seen < self.period {
            self.seed_sum += x;
            self.seen += 1;
            if self.seen == self.period {
                self.value = self.seed_sum / self.period as f64;
                return self.value;
            }
            return f64::NAN;
        }
        self.value += self.alpha * (x - self.value);
        self.value
    }
}

fn smooth_cascade(values: &[f64], period: usize, alpha: f64, depth: usize) -> Vec<Vec<f64>> {
    let n = values.len();
    let mut stages = vec![Stage::new(period, alpha); depth];
    let mut out = vec![nan_vec(n); depth];

    for (i, &x) in values.iter().enumerate() {
        let mut input = x;
        for (stage, series) in stages.iter_mut().zip(out.iter_mut()) {
            input = stage.update(input);
            series[i] = input;
        }
    }
    out
}

/// Double Exponential Moving Average (DEMA)
///
/// DEMA = 2 × EMA - EMA(EMA), undefined for the first `2 × (period - 1)` values.
pub fn dema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let stages = ema_cascade(values, period, 2)?;
    Ok(stages[0]
        .iter()
        .zip(&stages[1])
        .map(|(e1, e2)| 2.0 * e1 - e2)
        .collect())
}

/// Triple Exponential Moving Average (TEMA)
///
/// TEMA = 3 × EMA - 3 × EMA(EMA) + EMA(EMA(EMA)), undefined for the first
/// `3 × (period - 1)` values.
pub fn tema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let stages = ema_cascade(values, period, 3)?;
    Ok((0..values.len())
        .map(|i| 3.0 * stages[0][i] - 3.0 * stages[1][i] + stages[2][i])
        .collect())
}

/// Tillson T3
///
/// Six cascaded EMAs `e1..e6` combined as `c1·e6 + c2·e5 + c3·e4 + c4·e3`
/// with
///
/// ```text
/// c1 = -a³
/// c2 = 3a² + 3a³
/// c3 = -6a² - 3a - 3a³
/// c4 = 1 + 3a + a³ + 3a²
/// ```
///
/// where `a` is the volume factor (usually [`T3_VOLUME_FACTOR`]). The
/// coefficients sum to one, so a constant series is preserved. Undefined for
/// the first `6 × (period - 1)` values.
///
/// # Errors
/// `InvalidParameter` if `volume_factor` is negative or not finite.
pub fn t3(values: &[f64], period: usize, volume_factor: f64) -> Result<Vec<f64>> {
    check_non_negative("volume_factor", volume_factor)?;
    let a = volume_factor;
    let (a2, a3) = (a * a, a * a * a);
    let c1 = -a3;
    let c2 = 3.0 * a2 + 3.0 * a3;
    let c3 = -6.0 * a2 - 3.0 * a - 3.0 * a3;
    let c4 = 1.0 + 3.0 * a + a3 + 3.0 * a2;

    let e = ema_cascade(values, period, 6)?;
    Ok((0..values.len())
        .map(|i| c1 * e[5][i] + c2 * e[4][i] + c3 * e[3][i] + c4 * e[2][i])
        .collect())
}

/// Inner SMA periods of a triangular moving average.
pub fn tma_periods(period: usize) -> (usize, usize) {
    if period % 2 == 0 {
        (period / 2, period / 2 + 1)
    } else {
        let inner = (period + 2) / 2; // ceil((period + 1) / 2)
        (inner, inner)
    }
}

/// Triangular Moving Average (TMA)
///
/// SMA of an SMA. For an even `period` the inner periods are `period / 2`
/// and `period / 2 + 1`, for an odd one both are `ceil((period + 1) / 2)`.
pub fn tma(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let (first, second) = tma_periods(period);
    sma(&sma(values, first)?, second)
}

/// Undefined prefix of [`tma`] on fully defined input.
pub fn tma_warmup(period: usize) -> Warmup {
    let (first, second) = tma_periods(period);
    Warmup::window(first).then(Warmup::window(second))
}

/// Smoothed Moving Average (SMMA)
///
/// Wilder's smoothing. Seeded with the SMA of the first `period` values,
/// then `SMMA = (prev × (period - 1) + value) / period`.
pub fn smma(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let mut stages = smooth_cascade(values, period, 1.0 / period as f64, 1);
    Ok(stages.pop().unwrap_or_default())
}

/// Linearly Weighted Moving Average (LWMA)
///
/// Weights `1..=period`, newest value heaviest, normalized by
/// `period × (period + 1) / 2`.
pub fn lwma(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let norm = (period * (period + 1)) as f64 / 2.0;
    let weights: Vec<f64> = (1..=period).map(|w| w as f64 / norm).collect();
    rolling_weighted_sum(values, &weights)
}

/// Weighted Close
///
/// `(2 × close + high + low) / 4`, pointwise.
pub fn wc(close: &[f64], high: &[f64], low: &[f64]) -> Result<Vec<f64>> {
    check_aligned(close, &[("high", high), ("low", low)])?;
    Ok(close
        .iter()
        .zip(high)
        .zip(low)
        .map(|((c, h), l)| (2.0 * c + h + l) / 4.0)
        .collect())
}

/// SMA or EMA, selected by `ma`.
pub fn moving_average(values: &[f64], period: usize, ma: MaType) -> Result<Vec<f64>> {
    match ma {
        MaType::Sma => sma(values, period),
        MaType::Ema => ema(values, period),
    }
}
