//! Per-candle geometry and trend context.

use crate::common::check_aligned;
use crate::error::Result;
use crate::moving_averages::ema;

/// EMA period of the body average that separates long and short bodies.
pub const BODY_AVERAGE_PERIOD: usize = 14;

/// A body is a doji body when it is at most this percentage of the range.
pub const DOJI_BODY_PCT: f64 = 5.0;

/// Shadows are equal when the smaller is at least this fraction of the larger.
pub const EQUAL_SHADOW_RATIO: f64 = 2.0 / 3.0;

/// Aligned OHLC series plus the running body average.
#[derive(Debug, Clone)]
pub struct Candles<'a> {
    open: &'a [f64],
    high: &'a [f64],
    low: &'a [f64],
    close: &'a [f64],
    body_avg: Vec<f64>,
}

impl<'a> Candles<'a> {
    /// Validates that all four series share one length.
    pub fn new(open: &'a [f64], high: &'a [f64], low: &'a [f64], close: &'a [f64]) -> Result<Self> {
        let n = check_aligned(open, &[("high", high), ("low", low), ("close", close)])?;
        tracing::trace!(bars = n, "candles");
        let bodies: Vec<f64> = open.iter().zip(close).map(|(o, c)| (c - o).abs()).collect();
        let body_avg = ema(&bodies, BODY_AVERAGE_PERIOD)?;
        Ok(Self {
            open,
            high,
            low,
            close,
            body_avg,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Geometry of the candle at `index`.
    #[inline]
    pub fn at(&self, index: usize) -> Candle {
        Candle::new(
            self.open[index],
            self.high[index],
            self.low[index],
            self.close[index],
            self.body_avg[index],
        )
    }

    /// Trend over the `period` closes that end just before `start`.
    ///
    /// `Sideways` when fewer than `period` closes precede `start`.
    pub fn trend_before(&self, start: usize, period: usize) -> Trend {
        if period == 0 || start < period {
            return Trend::Sideways;
        }
        Trend::classify(&self.close[start - period..start])
    }
}

/// Prevailing direction of a run of closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

impl Trend {
    /// Down when the last close is below both the first close and the mean
    /// of the window, up when it is above both.
    pub fn classify(closes: &[f64]) -> Trend {
        let (Some(&first), Some(&last)) = (closes.first(), closes.last()) else {
            return Trend::Sideways;
        };
        let mean = closes.iter().sum::<f64>() / closes.len() as f64;
        if last < first && last < mean {
            Trend::Down
        } else if last > first && last > mean {
            Trend::Up
        } else {
            Trend::Sideways
        }
    }
}

/// Body and shadow measurements of one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub body: f64,
    pub body_high: f64,
    pub body_low: f64,
    pub body_mid: f64,
    pub upper_shadow: f64,
    pub lower_shadow: f64,
    pub range: f64,
    /// EMA of body sizes up to and including this candle.
    pub body_avg: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, body_avg: f64) -> Self {
        let body_high = open.max(close);
        let body_low = open.min(close);
        Self {
            open,
            high,
            low,
            close,
            body: (close - open).abs(),
            body_high,
            body_low,
            body_mid: (open + close) / 2.0,
            upper_shadow: high - body_high,
            lower_shadow: body_low - low,
            range: high - low,
            body_avg,
        }
    }

    #[inline]
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    /// Body larger than the body average.
    #[inline]
    pub fn has_long_body(&self) -> bool {
        self.body > self.body_avg
    }

    /// Body smaller than the body average.
    #[inline]
    pub fn has_short_body(&self) -> bool {
        self.body < self.body_avg
    }

    #[inline]
    pub fn has_doji_body(&self) -> bool {
        self.range > 0.0 && self.body <= self.range * DOJI_BODY_PCT / 100.0
    }

    /// Upper shadow longer than `shadow_margin` percent of the body.
    #[inline]
    pub fn has_upper_shadow(&self, shadow_margin: f64) -> bool {
        self.upper_shadow > self.body * shadow_margin / 100.0
    }

    /// Lower shadow longer than `shadow_margin` percent of the body.
    #[inline]
    pub fn has_lower_shadow(&self, shadow_margin: f64) -> bool {
        self.lower_shadow > self.body * shadow_margin / 100.0
    }

    #[inline]
    pub fn is_marubozu(&self, shadow_margin: f64) -> bool {
        !self.has_upper_shadow(shadow_margin) && !self.has_lower_shadow(shadow_margin)
    }

    pub fn has_equal_shadows(&self) -> bool {
        let (small, large) = if self.upper_shadow < self.lower_shadow {
            (self.upper_shadow, self.lower_shadow)
        } else {
            (self.lower_shadow, self.upper_shadow)
        };
        small >= large * EQUAL_SHADOW_RATIO
    }
}
