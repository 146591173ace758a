//! Momentum indicators
//!
//! Indicators that measure the rate of change or strength of price movements.

use crate::common::{changes, check_aligned, check_period, gains_losses, nan_vec, safe_div, Warmup};
use crate::error::{IndicatorError, Result};
use crate::moving_averages::{ema, moving_average, sma, smma};
use crate::options::{MaType, RsiType};
use crate::statistics::pct_change;
use crate::window::{rolling, rolling_argmax, rolling_argmin, Reduction};

/// Standard MACD fast EMA period.
pub const MACD_FAST: usize = 12;
/// Standard MACD slow EMA period.
pub const MACD_SLOW: usize = 26;
/// Standard MACD signal EMA period.
pub const MACD_SIGNAL: usize = 9;
/// Default APO/PPO fast period.
pub const OSC_FAST: usize = 12;
/// Default APO/PPO slow period.
pub const OSC_SLOW: usize = 26;
/// Default CCI period.
pub const CCI_PERIOD: usize = 20;
/// Default Aroon period.
pub const AROON_PERIOD: usize = 20;

const CCI_CONSTANT: f64 = 0.015;

/// Maps average gain/loss (or up/down flow) to a 0..100 index.
///
/// No losses gives 100 when there were gains and 50 when flat.
#[inline]
fn strength_index(gain: f64, loss: f64) -> f64 {
    if gain.is_nan() || loss.is_nan() {
        return f64::NAN;
    }
    // windowed sums can drift just below zero
    let (gain, loss) = (gain.max(0.0), loss.max(0.0));
    if loss != 0.0 {
        100.0 - 100.0 / (1.0 + gain / loss)
    } else if gain != 0.0 {
        100.0
    } else {
        50.0
    }
}

/// RSI - Relative Strength Index
///
/// `RSI = 100 - 100 / (1 + avg_gain / avg_loss)` over the last `period`
/// price changes. [`RsiType::Smoothed`] uses Wilder smoothing seeded with a
/// simple mean, [`RsiType::Standard`] a plain mean of the trailing window.
///
/// The first value is at index `period`.
pub fn rsi(values: &[f64], period: usize, rsi_type: RsiType) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let (gains, losses) = gains_losses(&changes(values));
    let (avg_gain, avg_loss) = match rsi_type {
        RsiType::Smoothed => (smma(&gains, period)?, smma(&losses, period)?),
        RsiType::Standard => (sma(&gains, period)?, sma(&losses, period)?),
    };
    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| strength_index(g, l))
        .collect())
}

/// MACD line, signal line and histogram.
pub type Macd = (Vec<f64>, Vec<f64>, Vec<f64>);

/// MACD with the standard 12/26/9 periods.
pub fn macd(values: &[f64]) -> Result<Macd> {
    macd_with(values, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}

/// MACD - Moving Average Convergence Divergence
///
/// Returns (macd_line, signal_line, histogram)
///
/// Formula:
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(MACD Line, signal)
/// - Histogram = MACD Line - Signal Line
///
/// The signal EMA is seeded once the MACD line has `signal` values, so it
/// starts at index `slow + signal - 2`.
pub fn macd_with(values: &[f64], fast: usize, slow: usize, signal: usize) -> Result<Macd> {
    check_period("fast", fast)?;
    check_period("slow", slow)?;
    check_period("signal", signal)?;
    if fast >= slow {
        tracing::debug!(fast, slow, "rejected MACD periods");
        return Err(IndicatorError::parameter(
            "fast",
            fast,
            "must be smaller than the slow period",
        ));
    }

    let fast_ema = ema(values, fast)?;
    let slow_ema = ema(values, slow)?;
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema(&line, signal)?;
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();
    Ok((line, signal_line, histogram))
}

/// Williams %R
///
/// `-100 × (highest_high - close) / (highest_high - lowest_low)` over the
/// last `period` bars. NaN on a flat window.
pub fn willr(close: &[f64], high: &[f64], low: &[f64], period: usize) -> Result<Vec<f64>> {
    check_aligned(close, &[("high", high), ("low", low)])?;
    let highest = rolling(high, period, Reduction::Max)?;
    let lowest = rolling(low, period, Reduction::Min)?;
    Ok((0..close.len())
        .map(|i| safe_div(highest[i] - close[i], highest[i] - lowest[i]) * -100.0)
        .collect())
}

/// ROC - Price Rate of Change
///
/// `100 × (price - price[period ago]) / price[period ago]`
pub fn roc(values: &[f64], period: usize) -> Result<Vec<f64>> {
    Ok(pct_change(values, period)?
        .into_iter()
        .map(|x| x * 100.0)
        .collect())
}

/// Volume Price Trend
///
/// Starts at `volume[0]` and accumulates
/// `volume × (close - previous close) / previous close`. A zero previous
/// close adds nothing.
pub fn vpt(close: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("volume", volume)])?;
    let mut result = Vec::with_capacity(n);
    let mut total = 0.0;
    for i in 0..n {
        if i == 0 {
            total = volume[0];
        } else if close[i - 1] != 0.0 {
            total += (close[i] - close[i - 1]) / close[i - 1] * volume[i];
        }
        result.push(total);
    }
    Ok(result)
}

/// Momentum Indicator: `price - price[period ago]`.
pub fn mi(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let n = values.len();
    let mut result = nan_vec(n);
    for i in Warmup::lag(period).len()..n {
        result[i] = values[i] - values[i - period];
    }
    Ok(result)
}

/// APO - Absolute Price Oscillator: `MA(fast) - MA(slow)`.
pub fn apo(values: &[f64], period_slow: usize, period_fast: usize, ma: MaType) -> Result<Vec<f64>> {
    check_period("period_slow", period_slow)?;
    check_period("period_fast", period_fast)?;
    let fast = moving_average(values, period_fast, ma)?;
    let slow = moving_average(values, period_slow, ma)?;
    Ok(fast.iter().zip(&slow).map(|(f, s)| f - s).collect())
}

/// PPO - Percentage Price Oscillator: `100 × (MA(fast) - MA(slow)) / MA(slow)`.
pub fn ppo(values: &[f64], period_fast: usize, period_slow: usize, ma_type: MaType) -> Result<Vec<f64>> {
    check_period("period_fast", period_fast)?;
    check_period("period_slow", period_slow)?;
    let fast = moving_average(values, period_fast, ma_type)?;
    let slow = moving_average(values, period_slow, ma_type)?;
    Ok(fast
        .iter()
        .zip(&slow)
        .map(|(&f, &s)| safe_div(f - s, s) * 100.0)
        .collect())
}

/// BOP - Balance of Power: `(close - open) / (high - low)`, zero when the
/// bar has no range.
pub fn bop(high: &[f64], low: &[f64], open: &[f64], close: &[f64]) -> Result<Vec<f64>> {
    check_aligned(high, &[("low", low), ("open", open), ("close", close)])?;
    Ok((0..high.len())
        .map(|i| {
            let range = high[i] - low[i];
            if range > 0.0 {
                (close[i] - open[i]) / range
            } else if range.is_nan() {
                f64::NAN
            } else {
                0.0
            }
        })
        .collect())
}

/// CMO - Chande Momentum Oscillator
///
/// `100 × (up - down) / (up + down)` where `up`/`down` sum the positive and
/// negative close changes of the last `period` steps. First value at index
/// `period`, NaN when the window is flat.
pub fn cmo(close: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("period", period)?;
    let (gains, losses) = gains_losses(&changes(close));
    let up = rolling(&gains, period, Reduction::Sum)?;
    let down = rolling(&losses, period, Reduction::Sum)?;
    Ok(up
        .iter()
        .zip(&down)
        .map(|(&u, &d)| safe_div(u - d, u + d) * 100.0)
        .collect())
}

/// MFI - Money Flow Index
///
/// Raw money flow is typical price × volume, counted as positive when the
/// typical price rose and negative when it fell. Over the last `period`
/// steps `MFI = 100 - 100 / (1 + positive / negative)`, first value at index
/// `period`. No negative flow gives 100, no flow at all gives 50.
pub fn mfi(high: &[f64], low: &[f64], close: &[f64], volume: &[f64], period: usize) -> Result<Vec<f64>> {
    let n = check_aligned(high, &[("low", low), ("close", close), ("volume", volume)])?;
    check_period("period", period)?;

    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();
    let mut positive = nan_vec(n);
    let mut negative = nan_vec(n);
    for i in 1..n {
        let flow = typical[i] * volume[i];
        let (up, down) = if typical[i] > typical[i - 1] {
            (flow, 0.0)
        } else if typical[i] < typical[i - 1] {
            (0.0, flow)
        } else {
            (0.0, 0.0)
        };
        positive[i] = up;
        negative[i] = down;
    }

    let up = rolling(&positive, period, Reduction::Sum)?;
    let down = rolling(&negative, period, Reduction::Sum)?;
    Ok(up
        .iter()
        .zip(&down)
        .map(|(&u, &d)| strength_index(u, d))
        .collect())
}

/// CCI - Commodity Channel Index
///
/// `(TP - SMA(TP)) / (0.015 × mean deviation)` with typical price
/// `TP = (high + low + close) / 3`. NaN when the mean deviation is zero.
pub fn cci(close: &[f64], high: &[f64], low: &[f64], period: usize) -> Result<Vec<f64>> {
    let n = check_aligned(close, &[("high", high), ("low", low)])?;
    check_period("period", period)?;
    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();
    let mean = sma(&typical, period)?;

    let mut result = nan_vec(n);
    for i in Warmup::window(period).len()..n {
        if mean[i].is_nan() {
            continue;
        }
        let window = &typical[(i + 1 - period)..=i];
        let deviation = window.iter().map(|tp| (tp - mean[i]).abs()).sum::<f64>() / period as f64;
        result[i] = safe_div(typical[i] - mean[i], CCI_CONSTANT * deviation);
    }
    Ok(result)
}

/// Aroon up and down lines.
///
/// Over the last `period + 1` bars, `up = 100 × (period - bars since the
/// highest high) / period` and `down` likewise for the lowest low. On a flat
/// top or bottom the count starts from the first bar that reached the
/// extreme. First value at index `period`.
pub fn aroon_lines(high: &[f64], low: &[f64], period: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    check_aligned(high, &[("low", low)])?;
    check_period("period", period)?;
    let span = period + 1;
    let since = |i: usize, pos: Option<usize>| {
        pos.map_or(f64::NAN, |j| 100.0 * (period - (i - j)) as f64 / period as f64)
    };
    let up = rolling_argmax(high, span)?
        .into_iter()
        .enumerate()
        .map(|(i, pos)| since(i, pos))
        .collect();
    let down = rolling_argmin(low, span)?
        .into_iter()
        .enumerate()
        .map(|(i, pos)| since(i, pos))
        .collect();
    Ok((up, down))
}

/// Aroon Oscillator: `aroon_up - aroon_down`.
pub fn aroon(high: &[f64], low: &[f64], period: usize) -> Result<Vec<f64>> {
    let (up, down) = aroon_lines(high, low, period)?;
    Ok(up.iter().zip(&down).map(|(u, d)| u - d).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn closes() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // ===== RSI Tests =====

    #[test]
    fn test_rsi_first_value_at_period() {
        let prices = closes();
        let result = rsi(&prices, 14, RsiType::Smoothed).unwrap();
        assert!(result[13].is_nan());
        assert!(!result[14].is_nan());
        assert!(result[14..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_rsi_smoothed_matches_wilder() {
        let prices = [1.0, 2.0, 1.5, 2.5, 2.0, 3.0];
        let result = rsi(&prices, 2, RsiType::Smoothed).unwrap();
        // changes: +1, -0.5, +1, -0.5, +1
        let (mut g, mut l) = (0.5, 0.25);
        assert!(approx_eq(result[2], 100.0 - 100.0 / (1.0 + g / l), EPSILON));
        g = (g + 1.0) / 2.0;
        l /= 2.0;
        assert!(approx_eq(result[3], 100.0 - 100.0 / (1.0 + g / l), EPSILON));
    }

    #[test]
    fn test_rsi_standard_uses_window_mean() {
        let prices = [1.0, 2.0, 1.5, 2.5, 2.0, 3.0];
        let result = rsi(&prices, 2, RsiType::Standard).unwrap();
        // every two-change window holds +1 and -0.5
        for value in &result[2..] {
            assert!(approx_eq(*value, 100.0 - 100.0 / 3.0, EPSILON));
        }
    }

    #[test]
    fn test_rsi_edge_conventions() {
        let rising: Vec<f64> = (0..10).map(|x| x as f64).collect();
        assert!(rsi(&rising, 3, RsiType::Smoothed).unwrap()[3..].iter().all(|&v| v == 100.0));
        let flat = vec![5.0; 10];
        assert!(rsi(&flat, 3, RsiType::Standard).unwrap()[3..].iter().all(|&v| v == 50.0));
    }

    // ===== MACD Tests =====

    #[test]
    fn test_macd_standard_warmup() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let (line, signal, histogram) = macd(&prices).unwrap();
        assert!(line[24].is_nan() && !line[25].is_nan());
        assert!(signal[32].is_nan() && !signal[33].is_nan());
        let seed = line[25..=33].iter().sum::<f64>() / 9.0;
        assert!(approx_eq(signal[33], seed, EPSILON));
        assert!(approx_eq(histogram[40], line[40] - signal[40], EPSILON));
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(macd_with(&[1.0; 40], 26, 12, 9).is_err());
        assert!(macd_with(&[1.0; 40], 5, 5, 9).is_err());
        assert!(macd_with(&[1.0; 40], 5, 10, 0).is_err());
    }

    // ===== Williams %R Tests =====

    #[test]
    fn test_willr_bounds() {
        let close = [5.0, 6.0, 7.0, 6.5, 5.5];
        let high = [5.5, 6.5, 7.5, 7.0, 6.0];
        let low = [4.5, 5.5, 6.5, 6.0, 5.0];
        let result = willr(&close, &high, &low, 3).unwrap();
        assert!(result[1].is_nan());
        // window high 7.5, low 4.5
        assert_relative_eq!(result[2], -100.0 * 0.5 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(result[4], -100.0 * 2.0 / 2.5, epsilon = 1e-9);
    }

    // ===== ROC / MI / VPT Tests =====

    #[test]
    fn test_roc_and_mi() {
        let prices = [10.0, 11.0, 12.0, 9.0];
        let r = roc(&prices, 2).unwrap();
        let m = mi(&prices, 2).unwrap();
        assert!(r[1].is_nan() && m[1].is_nan());
        assert_relative_eq!(r[2], 20.0, epsilon = 1e-9);
        assert_relative_eq!(m[3], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vpt_accumulates() {
        let close = [10.0, 11.0, 0.0, 5.0];
        let volume = [100.0, 200.0, 300.0, 400.0];
        let result = vpt(&close, &volume).unwrap();
        assert_eq!(result[0], 100.0);
        assert_relative_eq!(result[1], 120.0, epsilon = 1e-9);
        assert_relative_eq!(result[2], 120.0 - 300.0, epsilon = 1e-9);
        // zero previous close adds nothing
        assert_relative_eq!(result[3], result[2], epsilon = 1e-9);
    }

    // ===== APO / PPO Tests =====

    #[test]
    fn test_apo_and_ppo() {
        let prices: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let a = apo(&prices, 4, 2, MaType::Sma).unwrap();
        // SMA(2) - SMA(4) on a unit ramp
        assert!(a[2].is_nan());
        assert_relative_eq!(a[3], 1.0, epsilon = 1e-9);
        let p = ppo(&prices, 2, 4, MaType::Sma).unwrap();
        assert_relative_eq!(p[3], 100.0 / 2.5, epsilon = 1e-9);
        assert_eq!(ppo(&prices, OSC_FAST, OSC_SLOW, MaType::Ema).unwrap().len(), 30);
    }

    // ===== BOP / CMO Tests =====

    #[test]
    fn test_bop() {
        let result = bop(&[12.0, 10.0], &[8.0, 10.0], &[9.0, 10.0], &[11.0, 10.0]).unwrap();
        assert_relative_eq!(result[0], 0.5, epsilon = 1e-9);
        assert_eq!(result[1], 0.0);
    }

    #[test]
    fn test_cmo() {
        let close = [10.0, 11.0, 10.5, 11.5, 11.5];
        let result = cmo(&close, 2).unwrap();
        assert!(result[1].is_nan());
        // up 1, down 0.5
        assert_relative_eq!(result[2], 100.0 * 0.5 / 1.5, epsilon = 1e-9);
        // up 1, down 0.5
        assert_relative_eq!(result[3], 100.0 * 0.5 / 1.5, epsilon = 1e-9);
        // up 1, down 0
        assert_relative_eq!(result[4], 100.0, epsilon = 1e-9);
    }

    // ===== MFI Tests =====

    #[test]
    fn test_mfi() {
        let high = [10.0, 11.0, 10.5, 12.0];
        let low = [9.0, 10.0, 9.5, 11.0];
        let close = [9.5, 10.5, 10.0, 11.5];
        let volume = [100.0, 100.0, 200.0, 100.0];
        let result = mfi(&high, &low, &close, &volume, 2).unwrap();
        assert!(result[1].is_nan());
        let up = 10.5 * 100.0;
        let down = 10.0 * 200.0;
        assert!(approx_eq(result[2], 100.0 - 100.0 / (1.0 + up / down), EPSILON));

        let flat = [1.0; 5];
        assert!(mfi(&flat, &flat, &flat, &flat, 2).unwrap()[2..].iter().all(|&v| v == 50.0));
    }

    // ===== CCI Tests =====

    #[test]
    fn test_cci() {
        let close = [1.0, 2.0, 3.0];
        let result = cci(&close, &close, &close, 3).unwrap();
        // mean 2, mean deviation 2/3
        assert!(result[1].is_nan());
        assert!(approx_eq(result[2], 1.0 / (0.015 * 2.0 / 3.0), EPSILON));
        let flat = [4.0; 5];
        assert!(cci(&flat, &flat, &flat, 3).unwrap().iter().all(|v| v.is_nan()));
    }

    // ===== Aroon Tests =====

    #[test]
    fn test_aroon() {
        let high = [1.0, 3.0, 2.0, 4.0, 3.0, 2.0];
        let low = [0.5, 2.0, 1.0, 3.0, 2.5, 1.5];
        let (up, down) = aroon_lines(&high, &low, 3).unwrap();
        assert!(up[2].is_nan());
        // window 0..=3: high at 3, low at 0
        assert_relative_eq!(up[3], 100.0, epsilon = 1e-9);
        assert_relative_eq!(down[3], 0.0, epsilon = 1e-9);
        // window 2..=5: high at 3 (2 bars back), low at 2 (3 bars back)
        assert_relative_eq!(up[5], 100.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(down[5], 0.0, epsilon = 1e-9);
        let osc = aroon(&high, &low, 3).unwrap();
        assert_relative_eq!(osc[3], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_aroon_flat_extremes_count_from_first_bar() {
        let (up, down) = aroon_lines(&[1.0, 3.0, 3.0, 2.0], &[0.5, 1.0, 1.0, 2.0], 2).unwrap();
        assert!(up[1].is_nan());
        // window 0..=2: first 3.0 high one bar back
        assert_relative_eq!(up[2], 50.0, epsilon = 1e-9);
        // window 1..=3: both 3.0 highs and both 1.0 lows, first of each two bars back
        assert_relative_eq!(up[3], 0.0, epsilon = 1e-9);
        assert_relative_eq!(down[3], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_momentum_rejects_bad_input() {
        assert!(rsi(&[1.0, 2.0], 0, RsiType::Smoothed).is_err());
        assert!(willr(&[1.0], &[1.0, 2.0], &[1.0], 1).is_err());
        assert!(mfi(&[1.0], &[1.0], &[1.0], &[], 1).is_err());
        assert!(aroon(&[1.0], &[1.0], 0).is_err());
        assert!(cci(&[1.0], &[1.0], &[1.0], 0).is_err());
    }
}
