//! Indicator metadata: the name each transform is published under, its family
//! and the series and parameters it takes.

use serde::Serialize;

/// Indicator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Trend,
    Statistical,
    Volatility,
    Momentum,
    Volume,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorInfo {
    pub name: &'static str,
    pub family: Family,
    /// Input series, in call order.
    pub inputs: &'static [&'static str],
    /// Scalar and option parameters, in call order.
    pub params: &'static [&'static str],
    /// Output series names.
    pub outputs: &'static [&'static str],
}

const CLOSE: &[&str] = &["close"];
const CLOSE_HL: &[&str] = &["close", "high", "low"];
const CLOSE_VOLUME: &[&str] = &["close", "volume"];
const CLOSE_HLV: &[&str] = &["close", "high", "low", "volume"];
const OHLC: &[&str] = &["open", "high", "low", "close"];
const OUT: &[&str] = &["value"];
const BANDS: &[&str] = &["upper", "middle", "lower"];

macro_rules! info {
    ($name:literal, $family:ident, $inputs:expr, [$($param:literal),*]) => {
        info!($name, $family, $inputs, [$($param),*], OUT)
    };
    ($name:literal, $family:ident, $inputs:expr, [$($param:literal),*], $outputs:expr) => {
        IndicatorInfo {
            name: $name,
            family: Family::$family,
            inputs: $inputs,
            params: &[$($param),*],
            outputs: $outputs,
        }
    };
}

/// Every published indicator and pattern.
pub static INDICATORS: &[IndicatorInfo] = &[
    // Trend
    info!("sma", Trend, CLOSE, ["period"]),
    info!("ema", Trend, CLOSE, ["period"]),
    info!("dema", Trend, CLOSE, ["period"]),
    info!("tema", Trend, CLOSE, ["period"]),
    info!("t3", Trend, CLOSE, ["period", "volume_factor"]),
    info!("tma", Trend, CLOSE, ["period"]),
    info!("smma", Trend, CLOSE, ["period"]),
    info!("lwma", Trend, CLOSE, ["period"]),
    info!("wc", Trend, CLOSE_HL, []),
    // Statistical
    info!("std", Statistical, CLOSE, ["period", "normalize"]),
    info!("var", Statistical, CLOSE, ["period", "normalize"]),
    info!("cov", Statistical, &["close", "market"], ["period", "normalize"]),
    info!("beta", Statistical, &["close", "market"], ["period", "normalize"]),
    info!("pct_change", Statistical, CLOSE, ["period"]),
    // Volatility
    info!("atr", Volatility, CLOSE_HL, ["period"]),
    info!("bbands", Volatility, CLOSE, ["period", "deviation"], BANDS),
    info!("kc", Volatility, CLOSE_HL, ["period", "period_atr", "deviation"], BANDS),
    info!("cv", Volatility, &["high", "low"], ["period", "smoothing_period"]),
    // Momentum
    info!("rsi", Momentum, CLOSE, ["period", "type"]),
    info!("macd", Momentum, CLOSE, ["fast", "slow", "signal"], &["macd", "signal", "histogram"]),
    info!("willr", Momentum, CLOSE_HL, ["period"]),
    info!("roc", Momentum, CLOSE, ["period"]),
    info!("vpt", Momentum, CLOSE_VOLUME, []),
    info!("mi", Momentum, CLOSE, ["period"]),
    info!("apo", Momentum, CLOSE, ["period_slow", "period_fast", "ma"]),
    info!("bop", Momentum, &["high", "low", "open", "close"], []),
    info!("cmo", Momentum, CLOSE, ["period"]),
    info!("mfi", Momentum, &["high", "low", "close", "volume"], ["period"]),
    info!("ppo", Momentum, CLOSE, ["period_fast", "period_slow", "ma"]),
    info!("cci", Momentum, CLOSE_HL, ["period"]),
    info!("aroon", Momentum, &["high", "low"], ["period"]),
    // Volume
    info!("acdi", Volume, CLOSE_HLV, []),
    info!("obv", Volume, CLOSE_VOLUME, []),
    info!("cmf", Volume, CLOSE_HLV, ["period"]),
    info!("ci", Volume, CLOSE_HLV, []),
    info!("pvi", Volume, CLOSE_VOLUME, []),
    info!("nvi", Volume, CLOSE_VOLUME, []),
    // Patterns
    info!("hammer", Pattern, OHLC, ["trend_period", "shadow_margin"]),
    info!("inverted_hammer", Pattern, OHLC, ["trend_period", "shadow_margin"]),
    info!("doji", Pattern, OHLC, []),
    info!("dragonfly_doji", Pattern, OHLC, ["bottom_shadow"]),
    info!("marubozu", Pattern, OHLC, ["type", "shadow_margin"]),
    info!("spinning_top", Pattern, OHLC, ["type"]),
    info!("engulfing", Pattern, OHLC, ["type", "trend_period"]),
    info!("harami", Pattern, OHLC, ["type", "trend_period"]),
    info!("kicking", Pattern, OHLC, ["type", "shadow_margin"]),
    info!("piercing", Pattern, OHLC, ["trend_period"]),
    info!("three_white_soldiers", Pattern, OHLC, ["trend_period"]),
    info!("abandoned_baby", Pattern, OHLC, ["type", "trend_period"]),
    info!("belt_hold", Pattern, OHLC, ["type", "trend_period", "shadow_margin"]),
];

/// Find an indicator by name, ignoring case.
pub fn lookup(name: &str) -> Option<&'static IndicatorInfo> {
    INDICATORS
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name.trim()))
}

/// Indicators of one family, in catalog order.
pub fn by_family(family: Family) -> impl Iterator<Item = &'static IndicatorInfo> {
    INDICATORS.iter().filter(move |info| info.family == family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = INDICATORS.iter().map(|info| info.name).collect();
        assert_eq!(names.len(), INDICATORS.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("KC").map(|info| info.family), Some(Family::Volatility));
        assert_eq!(lookup(" hammer ").map(|info| info.inputs), Some(OHLC));
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn test_family_sizes() {
        assert_eq!(by_family(Family::Trend).count(), 9);
        assert_eq!(by_family(Family::Statistical).count(), 5);
        assert_eq!(by_family(Family::Volatility).count(), 4);
        assert_eq!(by_family(Family::Momentum).count(), 13);
        assert_eq!(by_family(Family::Volume).count(), 6);
        assert_eq!(by_family(Family::Pattern).count(), 13);
    }

    #[test]
    fn test_serializes_family_lowercase() {
        let json = serde_json::to_value(lookup("obv").unwrap()).unwrap();
        assert_eq!(json["family"], "volume");
        assert_eq!(json["inputs"], serde_json::json!(["close", "volume"]));
    }
}
