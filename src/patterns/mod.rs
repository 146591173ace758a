//! Candlestick pattern recognition
//!
//! Every detector returns one flag per bar, `true` where the pattern ends on
//! that bar. Patterns that need trend context look at the `trend_period`
//! closes before the pattern's first candle, so no flag can be set before
//! index `trend_period + candles - 1`. Long and short bodies are measured
//! against an EMA of body sizes ([`BODY_AVERAGE_PERIOD`]), which leaves them
//! undecided on the first bars of a series.
//!
//! ```
//! use candlekit::patterns::{doji, filter_labels, Candles};
//!
//! let open = [10.0, 10.0];
//! let high = [11.0, 10.5];
//! let low = [9.0, 9.5];
//! let close = [10.6, 10.01];
//! let candles = Candles::new(&open, &high, &low, &close).unwrap();
//! let hits = doji(&candles).unwrap();
//! assert_eq!(filter_labels(&hits, &["mon", "tue"]).unwrap(), vec!["tue"]);
//! ```

mod candle;
mod single;
mod three_candle;
mod two_candle;

pub use candle::{Candle, Candles, Trend, BODY_AVERAGE_PERIOD, DOJI_BODY_PCT, EQUAL_SHADOW_RATIO};
pub use single::{belt_hold, doji, dragonfly_doji, hammer, inverted_hammer, marubozu, spinning_top};
pub use three_candle::{abandoned_baby, three_white_soldiers};
pub use two_candle::{engulfing, harami, kicking, piercing};

use crate::common::{check_non_negative, check_period};
use crate::error::{IndicatorError, Result};

/// Default number of closes used to classify the preceding trend.
pub const DEFAULT_TREND_PERIOD: usize = 10;

/// Default shadow tolerance, as a percentage of the body.
pub const DEFAULT_SHADOW_MARGIN: f64 = 5.0;

/// Default minimum dragonfly lower shadow, as a percentage of the range.
pub const DEFAULT_BOTTOM_SHADOW: f64 = 50.0;

/// Keep the labels whose flag is set.
///
/// # Errors
/// `InvalidShape` when `labels` and `flags` differ in length.
pub fn filter_labels<T: Clone>(flags: &[bool], labels: &[T]) -> Result<Vec<T>> {
    if labels.len() != flags.len() {
        return Err(IndicatorError::shape("labels", flags.len(), labels.len()));
    }
    Ok(flags
        .iter()
        .zip(labels)
        .filter(|(hit, _)| **hit)
        .map(|(_, label)| label.clone())
        .collect())
}

/// Evaluate `rule` on every bar from `lookback` on.
fn scan<F>(candles: &Candles, lookback: usize, rule: F) -> Vec<bool>
where
    F: Fn(usize) -> bool,
{
    (0..candles.len()).map(|i| i >= lookback && rule(i)).collect()
}

fn check_margin(shadow_margin: f64) -> Result<()> {
    check_non_negative("shadow_margin", shadow_margin)
}

fn check_trend_period(trend_period: usize) -> Result<()> {
    check_period("trend_period", trend_period)
}
