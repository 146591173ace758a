//! Two-candle patterns. The trend context, where used, ends before the
//! first of the two candles.

use super::candle::{Candle, Candles, Trend};
use super::{check_margin, check_trend_period, scan};
use crate::error::Result;
use crate::options::PatternType;

/// `inner`'s body lies within `outer`'s body and is strictly smaller on at
/// least one side.
#[inline]
fn body_within(inner: &Candle, outer: &Candle) -> bool {
    inner.body_low >= outer.body_low
        && inner.body_high <= outer.body_high
        && (inner.body_low > outer.body_low || inner.body_high < outer.body_high)
}

#[inline]
fn reversal_trend(pattern: PatternType) -> Trend {
    match pattern {
        PatternType::Bull => Trend::Down,
        PatternType::Bear => Trend::Up,
    }
}

/// Engulfing
///
/// A short body followed by a long body of the opposite colour that covers
/// it. Bull: red then green after a downtrend. Bear: green then red after an
/// uptrend.
pub fn engulfing(candles: &Candles, pattern: PatternType, trend_period: usize) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    Ok(scan(candles, trend_period + 1, |i| {
        let prev = candles.at(i - 1);
        let cur = candles.at(i);
        if !(prev.has_short_body() && cur.has_long_body()) {
            return false;
        }
        let covers = match pattern {
            PatternType::Bull => {
                prev.is_red()
                    && cur.is_green()
                    && cur.open <= prev.close
                    && cur.close >= prev.open
                    && (cur.open < prev.close || cur.close > prev.open)
            }
            PatternType::Bear => {
                prev.is_green()
                    && cur.is_red()
                    && cur.open >= prev.close
                    && cur.close <= prev.open
                    && (cur.open > prev.close || cur.close < prev.open)
            }
        };
        covers && candles.trend_before(i - 1, trend_period) == reversal_trend(pattern)
    }))
}

/// Harami
///
/// A long body followed by a short, non-doji body held inside it. Bull: the
/// long body is red and follows a downtrend. Bear: the long body is green and
/// follows an uptrend.
pub fn harami(candles: &Candles, pattern: PatternType, trend_period: usize) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    Ok(scan(candles, trend_period + 1, |i| {
        let prev = candles.at(i - 1);
        let cur = candles.at(i);
        let colored = match pattern {
            PatternType::Bull => prev.is_red(),
            PatternType::Bear => prev.is_green(),
        };
        colored
            && prev.has_long_body()
            && cur.has_short_body()
            && !cur.has_doji_body()
            && body_within(&cur, &prev)
            && candles.trend_before(i - 1, trend_period) == reversal_trend(pattern)
    }))
}

/// Kicking
///
/// Two long marubozu candles of opposite colour with a gap between them.
/// Bull: red then green gapping up. Bear: green then red gapping down.
pub fn kicking(candles: &Candles, pattern: PatternType, shadow_margin: f64) -> Result<Vec<bool>> {
    check_margin(shadow_margin)?;
    Ok(scan(candles, 1, |i| {
        let prev = candles.at(i - 1);
        let cur = candles.at(i);
        let solid = |c: &Candle| c.has_long_body() && c.is_marubozu(shadow_margin);
        if !(solid(&prev) && solid(&cur)) {
            return false;
        }
        match pattern {
            PatternType::Bull => prev.is_red() && cur.is_green() && cur.low > prev.high,
            PatternType::Bear => prev.is_green() && cur.is_red() && cur.high < prev.low,
        }
    }))
}

/// Piercing Line
///
/// After a downtrend, a red candle followed by a green one that opens below
/// the red low and closes above the red body's midpoint without clearing it.
pub fn piercing(candles: &Candles, trend_period: usize) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    Ok(scan(candles, trend_period + 1, |i| {
        let prev = candles.at(i - 1);
        let cur = candles.at(i);
        prev.is_red()
            && cur.is_green()
            && cur.open < prev.low
            && cur.close > prev.body_mid
            && cur.close < prev.body_high
            && candles.trend_before(i - 1, trend_period) == Trend::Down
    }))
}
