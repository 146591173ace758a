//! Single-candle patterns.

use super::candle::{Candle, Candles, Trend};
use super::{check_margin, check_trend_period, scan};
use crate::common::check_finite;
use crate::error::{IndicatorError, Result};
use crate::options::PatternType;

/// Shadow strictly between 2× and 3× the body, each bound widened by
/// `shadow_margin` percent.
#[inline]
fn hammer_shadow(shadow: f64, body: f64, shadow_margin: f64) -> bool {
    let m = shadow_margin / 100.0;
    shadow > 2.0 * body * (1.0 - m) && shadow < 3.0 * body * (1.0 + m)
}

#[inline]
fn hammer_body(c: &Candle) -> bool {
    c.has_short_body() && !c.has_doji_body()
}

/// Hammer
///
/// After a downtrend: a short, non-doji body at the top of the range, no
/// upper shadow (within `shadow_margin`) and a lower shadow between two and
/// three times the body.
pub fn hammer(candles: &Candles, trend_period: usize, shadow_margin: f64) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    check_margin(shadow_margin)?;
    Ok(scan(candles, trend_period, |i| {
        let c = candles.at(i);
        hammer_body(&c)
            && !c.has_upper_shadow(shadow_margin)
            && hammer_shadow(c.lower_shadow, c.body, shadow_margin)
            && candles.trend_before(i, trend_period) == Trend::Down
    }))
}

/// Inverted Hammer
///
/// The hammer turned upside down: after a downtrend, a short body at the
/// bottom of the range with a long upper shadow and no lower shadow.
pub fn inverted_hammer(candles: &Candles, trend_period: usize, shadow_margin: f64) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    check_margin(shadow_margin)?;
    Ok(scan(candles, trend_period, |i| {
        let c = candles.at(i);
        hammer_body(&c)
            && !c.has_lower_shadow(shadow_margin)
            && hammer_shadow(c.upper_shadow, c.body, shadow_margin)
            && candles.trend_before(i, trend_period) == Trend::Down
    }))
}

/// Doji: a doji body with roughly equal shadows.
pub fn doji(candles: &Candles) -> Result<Vec<bool>> {
    Ok(scan(candles, 0, |i| {
        let c = candles.at(i);
        c.has_doji_body() && c.has_equal_shadows()
    }))
}

/// Dragonfly Doji
///
/// A doji body with an upper shadow no longer than the body and a lower
/// shadow longer than `bottom_shadow` percent of the range.
pub fn dragonfly_doji(candles: &Candles, bottom_shadow: f64) -> Result<Vec<bool>> {
    check_finite("bottom_shadow", bottom_shadow)?;
    if !(0.0..=100.0).contains(&bottom_shadow) {
        return Err(IndicatorError::parameter(
            "bottom_shadow",
            bottom_shadow,
            "must be a percentage between 0 and 100",
        ));
    }
    Ok(scan(candles, 0, |i| {
        let c = candles.at(i);
        c.has_doji_body()
            && c.upper_shadow <= c.body
            && c.lower_shadow > c.range * bottom_shadow / 100.0
    }))
}

#[inline]
fn has_color(c: &Candle, pattern: PatternType) -> bool {
    match pattern {
        PatternType::Bull => c.is_green(),
        PatternType::Bear => c.is_red(),
    }
}

/// Marubozu: a long body with no shadows (within `shadow_margin`), green
/// for bull and red for bear.
pub fn marubozu(candles: &Candles, pattern: PatternType, shadow_margin: f64) -> Result<Vec<bool>> {
    check_margin(shadow_margin)?;
    Ok(scan(candles, 0, |i| {
        let c = candles.at(i);
        has_color(&c, pattern) && c.has_long_body() && c.is_marubozu(shadow_margin)
    }))
}

/// Spinning Top: a non-doji body with each shadow at least a third of the
/// range, green for bull and red for bear.
pub fn spinning_top(candles: &Candles, pattern: PatternType) -> Result<Vec<bool>> {
    Ok(scan(candles, 0, |i| {
        let c = candles.at(i);
        let third = c.range / 3.0;
        has_color(&c, pattern)
            && !c.has_doji_body()
            && c.upper_shadow >= third
            && c.lower_shadow >= third
    }))
}

/// Belt Hold
///
/// Bull: after a downtrend, a long green body opening on its low.
/// Bear: after an uptrend, a long red body opening on its high.
pub fn belt_hold(
    candles: &Candles,
    pattern: PatternType,
    trend_period: usize,
    shadow_margin: f64,
) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    check_margin(shadow_margin)?;
    Ok(scan(candles, trend_period, |i| {
        let c = candles.at(i);
        if !c.has_long_body() {
            return false;
        }
        let trend = candles.trend_before(i, trend_period);
        match pattern {
            PatternType::Bull => c.is_green() && !c.has_lower_shadow(shadow_margin) && trend == Trend::Down,
            PatternType::Bear => c.is_red() && !c.has_upper_shadow(shadow_margin) && trend == Trend::Up,
        }
    }))
}
