//! # candlekit
//!
//! Technical indicators and candlestick pattern recognition over plain `f64`
//! series.
//!
//! ## Features
//! - Trend, statistical, volatility, momentum and volume indicators
//! - Candlestick patterns with trend context
//! - Output always as long as the input; warm-up positions are `NaN`
//! - Compiles to native and WASM
//!
//! ## Example
//! ```
//! use candlekit::{bbands, rsi, sma, RsiType};
//!
//! let prices = vec![44.0, 44.5, 45.0, 44.5, 45.5, 46.0, 45.5, 46.5];
//!
//! let sma_values = sma(&prices, 3).unwrap();
//! assert!(sma_values[1].is_nan());
//! assert_eq!(sma_values[2], 44.5);
//!
//! let rsi_values = rsi(&prices, 4, RsiType::Smoothed).unwrap();
//! assert_eq!(rsi_values.len(), prices.len());
//!
//! let (upper, middle, lower) = bbands(&prices, 5, 2.0).unwrap();
//! assert!(upper[4] > middle[4] && middle[4] > lower[4]);
//! ```

pub mod catalog;
pub mod common;
pub mod error;
pub mod momentum;
pub mod moving_averages;
pub mod options;
pub mod patterns;
pub mod statistics;
pub mod volatility;
pub mod volume;
pub mod window;

// Re-export commonly used items at crate root
pub use error::{IndicatorError, Result};
pub use options::{MaType, PatternType, RsiType};
pub use moving_averages::{dema, ema, lwma, moving_average, sma, smma, t3, tema, tma, wc};
pub use statistics::{beta, cov, pct_change};
pub use volatility::{atr, bbands, cv, kc, true_range, Bands};
pub use momentum::{apo, aroon, bop, cci, cmo, macd, macd_with, mfi, mi, ppo, roc, rsi, vpt, willr, Macd};
pub use volume::{acdi, ci, cmf, nvi, obv, pvi};
pub use patterns::{filter_labels, Candles};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
fn js<T>(result: Result<T>) -> std::result::Result<T, JsValue> {
    result.map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(feature = "wasm")]
fn flags(result: Result<Vec<bool>>) -> std::result::Result<Vec<u8>, JsValue> {
    js(result).map(|hits| hits.into_iter().map(u8::from).collect())
}

/// WASM bindings for browser/Node.js use
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct Indicators;

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl Indicators {
    // Trend
    #[wasm_bindgen]
    pub fn sma(values: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(moving_averages::sma(values, period))
    }

    #[wasm_bindgen]
    pub fn ema(values: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(moving_averages::ema(values, period))
    }

    #[wasm_bindgen]
    pub fn t3(values: &[f64], period: usize, volume_factor: f64) -> std::result::Result<Vec<f64>, JsValue> {
        js(moving_averages::t3(values, period, volume_factor))
    }

    #[wasm_bindgen]
    pub fn tma(values: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(moving_averages::tma(values, period))
    }

    // Statistical
    #[wasm_bindgen]
    pub fn std(values: &[f64], period: usize, normalize: bool) -> std::result::Result<Vec<f64>, JsValue> {
        js(statistics::std(values, period, normalize))
    }

    #[wasm_bindgen]
    pub fn beta(values: &[f64], market: &[f64], period: usize, normalize: bool) -> std::result::Result<Vec<f64>, JsValue> {
        js(statistics::beta(values, market, period, normalize))
    }

    // Volatility
    #[wasm_bindgen]
    pub fn atr(close: &[f64], high: &[f64], low: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(volatility::atr(close, high, low, period))
    }

    #[wasm_bindgen]
    pub fn bbands_middle(values: &[f64], period: usize, deviation: f64) -> std::result::Result<Vec<f64>, JsValue> {
        js(volatility::bbands(values, period, deviation)).map(|(_, middle, _)| middle)
    }

    // Momentum
    #[wasm_bindgen]
    pub fn rsi(values: &[f64], period: usize, rsi_type: &str) -> std::result::Result<Vec<f64>, JsValue> {
        let rsi_type = js(rsi_type.parse::<RsiType>())?;
        js(momentum::rsi(values, period, rsi_type))
    }

    #[wasm_bindgen]
    pub fn macd_line(values: &[f64], fast: usize, slow: usize, signal: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(momentum::macd_with(values, fast, slow, signal)).map(|(line, _, _)| line)
    }

    #[wasm_bindgen]
    pub fn ppo(values: &[f64], period_fast: usize, period_slow: usize, ma: &str) -> std::result::Result<Vec<f64>, JsValue> {
        let ma = js(ma.parse::<MaType>())?;
        js(momentum::ppo(values, period_fast, period_slow, ma))
    }

    #[wasm_bindgen]
    pub fn cci(close: &[f64], high: &[f64], low: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(momentum::cci(close, high, low, period))
    }

    // Volume
    #[wasm_bindgen]
    pub fn obv(close: &[f64], volume: &[f64]) -> std::result::Result<Vec<f64>, JsValue> {
        js(volume::obv(close, volume))
    }

    #[wasm_bindgen]
    pub fn cmf(close: &[f64], high: &[f64], low: &[f64], volume: &[f64], period: usize) -> std::result::Result<Vec<f64>, JsValue> {
        js(volume::cmf(close, high, low, volume, period))
    }

    // Patterns, one byte per bar
    #[wasm_bindgen]
    pub fn hammer(
        open: &[f64],
        high: &[f64],
        low: &[f64],
        close: &[f64],
        trend_period: usize,
        shadow_margin: f64,
    ) -> std::result::Result<Vec<u8>, JsValue> {
        let candles = js(Candles::new(open, high, low, close))?;
        flags(patterns::hammer(&candles, trend_period, shadow_margin))
    }

    #[wasm_bindgen]
    pub fn engulfing(
        open: &[f64],
        high: &[f64],
        low: &[f64],
        close: &[f64],
        pattern: &str,
        trend_period: usize,
    ) -> std::result::Result<Vec<u8>, JsValue> {
        let pattern = js(pattern.parse::<PatternType>())?;
        let candles = js(Candles::new(open, high, low, close))?;
        flags(patterns::engulfing(&candles, pattern, trend_period))
    }

    #[wasm_bindgen]
    pub fn doji(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> std::result::Result<Vec<u8>, JsValue> {
        let candles = js(Candles::new(open, high, low, close))?;
        flags(patterns::doji(&candles))
    }
}
