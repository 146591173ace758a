//! Three-candle patterns. The trend context ends before the oldest candle.

use super::candle::{Candle, Candles, Trend};
use super::{check_trend_period, scan, DEFAULT_SHADOW_MARGIN};
use crate::error::Result;
use crate::options::PatternType;

/// Three White Soldiers
///
/// After a downtrend, three long green bodies with little or no upper shadow,
/// each opening inside the previous body and closing above it.
pub fn three_white_soldiers(candles: &Candles, trend_period: usize) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    Ok(scan(candles, trend_period + 2, |i| {
        let soldiers = [candles.at(i - 2), candles.at(i - 1), candles.at(i)];
        let strong = |c: &Candle| {
            c.is_green() && c.has_long_body() && !c.has_upper_shadow(DEFAULT_SHADOW_MARGIN)
        };
        soldiers.iter().all(strong)
            && soldiers.windows(2).all(|pair| {
                let (prev, cur) = (&pair[0], &pair[1]);
                cur.open >= prev.body_low && cur.open <= prev.body_high && cur.close > prev.close
            })
            && candles.trend_before(i - 2, trend_period) == Trend::Down
    }))
}

/// Abandoned Baby
///
/// A doji gapping away from the candles on both sides. Bull: red, a doji
/// gapping below it, then green gapping back up, after a downtrend. Bear:
/// green, a doji gapping above it, then red gapping back down, after an
/// uptrend.
pub fn abandoned_baby(candles: &Candles, pattern: PatternType, trend_period: usize) -> Result<Vec<bool>> {
    check_trend_period(trend_period)?;
    Ok(scan(candles, trend_period + 2, |i| {
        let first = candles.at(i - 2);
        let baby = candles.at(i - 1);
        let last = candles.at(i);
        if !baby.has_doji_body() {
            return false;
        }
        let trend = candles.trend_before(i - 2, trend_period);
        match pattern {
            PatternType::Bull => {
                first.is_red()
                    && baby.high < first.low
                    && last.is_green()
                    && last.low > baby.high
                    && trend == Trend::Down
            }
            PatternType::Bear => {
                first.is_green()
                    && baby.low > first.high
                    && last.is_red()
                    && last.high < baby.low
                    && trend == Trend::Up
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::fixtures::{downtrend, uptrend};
    use crate::patterns::DEFAULT_TREND_PERIOD;

    #[test]
    fn test_three_white_soldiers() {
        let mut bars = downtrend();
        bars.push(70.0, 72.55, 69.8, 72.5);
        bars.push(71.5, 74.05, 71.3, 74.0);
        bars.push(73.0, 75.5, 72.9, 75.5);
        let hits = three_white_soldiers(&bars.candles(), DEFAULT_TREND_PERIOD).unwrap();
        assert_eq!(hits.iter().filter(|h| **h).count(), 1);
        assert!(hits[17]);
    }

    #[test]
    fn test_three_white_soldiers_gap_open() {
        let mut bars = downtrend();
        bars.push(70.0, 72.55, 69.8, 72.5);
        // opens above the previous body
        bars.push(73.0, 75.55, 72.9, 75.5);
        bars.push(74.0, 76.5, 73.9, 76.5);
        let hits = three_white_soldiers(&bars.candles(), DEFAULT_TREND_PERIOD).unwrap();
        assert!(!hits[17]);
    }

    #[test]
    fn test_bull_abandoned_baby() {
        let mut bars = downtrend();
        bars.push(70.0, 70.1, 67.8, 68.0);
        bars.push(66.5, 66.8, 66.2, 66.5);
        bars.push(67.5, 69.6, 67.2, 69.5);
        let candles = bars.candles();
        assert!(abandoned_baby(&candles, PatternType::Bull, DEFAULT_TREND_PERIOD).unwrap()[17]);
        assert!(!abandoned_baby(&candles, PatternType::Bear, DEFAULT_TREND_PERIOD).unwrap()[17]);
    }

    #[test]
    fn test_bear_abandoned_baby() {
        let mut bars = uptrend();
        bars.push(80.0, 82.2, 79.9, 82.0);
        bars.push(83.0, 83.3, 82.7, 83.0);
        bars.push(82.0, 82.5, 80.0, 80.2);
        let hits = abandoned_baby(&bars.candles(), PatternType::Bear, DEFAULT_TREND_PERIOD).unwrap();
        assert!(hits[17]);
    }

    #[test]
    fn test_abandoned_baby_needs_gap() {
        let mut bars = downtrend();
        bars.push(70.0, 70.1, 67.8, 68.0);
        // doji overlaps the first candle
        bars.push(67.9, 68.2, 67.6, 67.9);
        bars.push(68.5, 69.6, 68.3, 69.5);
        let hits = abandoned_baby(&bars.candles(), PatternType::Bull, DEFAULT_TREND_PERIOD).unwrap();
        assert!(!hits[17]);
    }
}
