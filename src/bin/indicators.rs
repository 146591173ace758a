//! CLI tool for computing indicators
//!
//! Reads a JSON object of named series from stdin (or `--input`) and writes a
//! JSON object of named outputs to stdout. Undefined values are written as
//! `null`.
//!
//! ```bash
//! echo '{"close": [1, 2, 3, 4, 5]}' | indicators sma -p period=2
//! indicators engulfing -p type=bear -p trend_period=8 < ohlc.json
//! indicators --list
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use candlekit::catalog::{self, IndicatorInfo};
use candlekit::patterns::{self, Candles, DEFAULT_BOTTOM_SHADOW, DEFAULT_SHADOW_MARGIN, DEFAULT_TREND_PERIOD};
use candlekit::{momentum, moving_averages, statistics, volatility, volume};
use candlekit::{IndicatorError, MaType, PatternType, RsiType};

/// Compute technical indicators and candlestick patterns over JSON series
#[derive(Parser, Debug)]
#[command(name = "indicators")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Indicator or pattern to compute (see --list)
    #[arg(required_unless_present = "list")]
    name: Option<String>,

    /// Parameter as key=value, repeatable
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Input JSON file (defaults to stdin)
    #[arg(short, long)]
    input: Option<String>,

    /// Print the indicator catalog and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.list {
        let listing = serde_json::to_string_pretty(catalog::INDICATORS)?;
        writeln!(io::stdout(), "{}", listing)?;
        return Ok(());
    }

    let (info, params) = resolve(args.name.as_deref().unwrap_or_default(), &args.params)?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };
    let document: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    let output = serde_json::to_string(&evaluate(info, &params, &document)?)?;
    writeln!(io::stdout(), "{}", output)?;
    Ok(())
}

/// Catalog entry and checked parameters for an indicator name.
fn resolve(name: &str, raw_params: &[String]) -> anyhow::Result<(&'static IndicatorInfo, Params)> {
    let info = catalog::lookup(name).ok_or_else(|| anyhow!("unknown indicator `{}`", name))?;
    let params = Params::parse(raw_params, info)?;
    Ok((info, params))
}

/// Decode the input document, run the indicator and encode its outputs.
fn evaluate(info: &IndicatorInfo, params: &Params, document: &Value) -> anyhow::Result<Value> {
    let series = Series::from_json(document)?;
    debug!(indicator = info.name, bars = series.len(), "computing");
    let output = compute(info, &series, params).with_context(|| format!("{} failed", info.name))?;
    Ok(output.to_json(info))
}

/// Input series by name.
struct Series(HashMap<String, Vec<f64>>);

impl Series {
    fn from_json(document: &Value) -> Result<Self, IndicatorError> {
        let object = document.as_object().ok_or_else(|| IndicatorError::InvalidType {
            name: "input".to_string(),
            expected: "object of named series",
        })?;
        let mut series = HashMap::with_capacity(object.len());
        for (name, value) in object {
            series.insert(name.to_lowercase(), numbers(name, value)?);
        }
        Ok(Self(series))
    }

    fn get(&self, name: &str) -> anyhow::Result<&[f64]> {
        self.0
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow!("missing input series `{}`", name))
    }

    fn len(&self) -> usize {
        self.0.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Decode one series. `null` elements are read as undefined.
fn numbers(name: &str, value: &Value) -> Result<Vec<f64>, IndicatorError> {
    let invalid = || IndicatorError::InvalidType {
        name: name.to_string(),
        expected: "array of numbers",
    };
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| match v {
            Value::Null => Ok(f64::NAN),
            other => other.as_f64().ok_or_else(invalid),
        })
        .collect()
}

/// `key=value` parameters, checked against the catalog entry.
#[derive(Debug)]
struct Params(HashMap<String, String>);

impl Params {
    fn parse(raw: &[String], info: &IndicatorInfo) -> anyhow::Result<Self> {
        let mut params = HashMap::new();
        for item in raw {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| anyhow!("parameter `{}` is not key=value", item))?;
            let key = key.trim().to_lowercase();
            if !info.params.contains(&key.as_str()) {
                bail!(
                    "`{}` takes no parameter `{}` (accepts: {})",
                    info.name,
                    key,
                    info.params.join(", ")
                );
            }
            params.insert(key, value.trim().to_string());
        }
        Ok(Self(params))
    }

    fn number<T: FromStr>(&self, name: &'static str, default: T, reason: &'static str) -> Result<T, IndicatorError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| IndicatorError::parameter(name, raw, reason)),
        }
    }

    fn period(&self, name: &'static str, default: usize) -> Result<usize, IndicatorError> {
        self.number(name, default, "must be a positive integer")
    }

    fn float(&self, name: &'static str, default: f64) -> Result<f64, IndicatorError> {
        self.number(name, default, "must be a number")
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, IndicatorError> {
        self.number(name, default, "must be true or false")
    }

    fn option<T>(&self, name: &'static str, default: T) -> Result<T, IndicatorError>
    where
        T: FromStr<Err = IndicatorError>,
    {
        self.0.get(name).map_or(Ok(default), |raw| raw.parse())
    }
}

enum Output {
    Values(Vec<Vec<f64>>),
    Flags(Vec<bool>),
}

impl Output {
    fn single(values: Vec<f64>) -> Self {
        Output::Values(vec![values])
    }

    fn bands((upper, middle, lower): (Vec<f64>, Vec<f64>, Vec<f64>)) -> Self {
        Output::Values(vec![upper, middle, lower])
    }

    fn to_json(&self, info: &IndicatorInfo) -> Value {
        let mut object = Map::new();
        match self {
            Output::Values(columns) => {
                for (name, column) in info.outputs.iter().zip(columns) {
                    let values = column
                        .iter()
                        .map(|v| serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number))
                        .collect();
                    object.insert((*name).to_string(), Value::Array(values));
                }
            }
            Output::Flags(hits) => {
                object.insert(info.name.to_string(), Value::from(hits.clone()));
            }
        }
        Value::Object(object)
    }
}

fn compute(info: &IndicatorInfo, s: &Series, p: &Params) -> anyhow::Result<Output> {
    let output = match info.name {
        // Trend
        "sma" => Output::single(moving_averages::sma(s.get("close")?, p.period("period", 20)?)?),
        "ema" => Output::single(moving_averages::ema(s.get("close")?, p.period("period", 20)?)?),
        "dema" => Output::single(moving_averages::dema(s.get("close")?, p.period("period", 20)?)?),
        "tema" => Output::single(moving_averages::tema(s.get("close")?, p.period("period", 20)?)?),
        "t3" => Output::single(moving_averages::t3(
            s.get("close")?,
            p.period("period", 5)?,
            p.float("volume_factor", moving_averages::T3_VOLUME_FACTOR)?,
        )?),
        "tma" => Output::single(moving_averages::tma(s.get("close")?, p.period("period", 20)?)?),
        "smma" => Output::single(moving_averages::smma(s.get("close")?, p.period("period", 20)?)?),
        "lwma" => Output::single(moving_averages::lwma(s.get("close")?, p.period("period", 20)?)?),
        "wc" => Output::single(moving_averages::wc(s.get("close")?, s.get("high")?, s.get("low")?)?),

        // Statistical
        "std" => Output::single(statistics::std(
            s.get("close")?,
            p.period("period", 20)?,
            p.flag("normalize", statistics::STAT_NORMALIZE)?,
        )?),
        "var" => Output::single(statistics::var(
            s.get("close")?,
            p.period("period", 20)?,
            p.flag("normalize", statistics::STAT_NORMALIZE)?,
        )?),
        "cov" => Output::single(statistics::cov(
            s.get("close")?,
            s.get("market")?,
            p.period("period", 20)?,
            p.flag("normalize", statistics::STAT_NORMALIZE)?,
        )?),
        "beta" => Output::single(statistics::beta(
            s.get("close")?,
            s.get("market")?,
            p.period("period", 20)?,
            p.flag("normalize", statistics::BETA_NORMALIZE)?,
        )?),
        "pct_change" => Output::single(statistics::pct_change(s.get("close")?, p.period("period", 1)?)?),

        // Volatility
        "atr" => Output::single(volatility::atr(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            p.period("period", 14)?,
        )?),
        "bbands" => Output::bands(volatility::bbands(
            s.get("close")?,
            p.period("period", 20)?,
            p.float("deviation", volatility::BAND_DEVIATION)?,
        )?),
        "kc" => Output::bands(volatility::kc(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            p.period("period", volatility::KC_PERIOD)?,
            p.period("period_atr", volatility::KC_PERIOD_ATR)?,
            p.float("deviation", volatility::BAND_DEVIATION)?,
        )?),
        "cv" => Output::single(volatility::cv(
            s.get("high")?,
            s.get("low")?,
            p.period("period", volatility::CV_PERIOD)?,
            p.period("smoothing_period", volatility::CV_SMOOTHING_PERIOD)?,
        )?),

        // Momentum
        "rsi" => Output::single(momentum::rsi(
            s.get("close")?,
            p.period("period", 14)?,
            p.option("type", RsiType::default())?,
        )?),
        "macd" => {
            let (line, signal, histogram) = momentum::macd_with(
                s.get("close")?,
                p.period("fast", momentum::MACD_FAST)?,
                p.period("slow", momentum::MACD_SLOW)?,
                p.period("signal", momentum::MACD_SIGNAL)?,
            )?;
            Output::Values(vec![line, signal, histogram])
        }
        "willr" => Output::single(momentum::willr(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            p.period("period", 14)?,
        )?),
        "roc" => Output::single(momentum::roc(s.get("close")?, p.period("period", 10)?)?),
        "vpt" => Output::single(momentum::vpt(s.get("close")?, s.get("volume")?)?),
        "mi" => Output::single(momentum::mi(s.get("close")?, p.period("period", 10)?)?),
        "apo" => Output::single(momentum::apo(
            s.get("close")?,
            p.period("period_slow", momentum::OSC_SLOW)?,
            p.period("period_fast", momentum::OSC_FAST)?,
            p.option("ma", MaType::Sma)?,
        )?),
        "bop" => Output::single(momentum::bop(
            s.get("high")?,
            s.get("low")?,
            s.get("open")?,
            s.get("close")?,
        )?),
        "cmo" => Output::single(momentum::cmo(s.get("close")?, p.period("period", 14)?)?),
        "mfi" => Output::single(momentum::mfi(
            s.get("high")?,
            s.get("low")?,
            s.get("close")?,
            s.get("volume")?,
            p.period("period", 14)?,
        )?),
        "ppo" => Output::single(momentum::ppo(
            s.get("close")?,
            p.period("period_fast", momentum::OSC_FAST)?,
            p.period("period_slow", momentum::OSC_SLOW)?,
            p.option("ma", MaType::Ema)?,
        )?),
        "cci" => Output::single(momentum::cci(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            p.period("period", momentum::CCI_PERIOD)?,
        )?),
        "aroon" => Output::single(momentum::aroon(
            s.get("high")?,
            s.get("low")?,
            p.period("period", momentum::AROON_PERIOD)?,
        )?),

        // Volume
        "acdi" => Output::single(volume::acdi(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            s.get("volume")?,
        )?),
        "obv" => Output::single(volume::obv(s.get("close")?, s.get("volume")?)?),
        "cmf" => Output::single(volume::cmf(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            s.get("volume")?,
            p.period("period", volume::CMF_PERIOD)?,
        )?),
        "ci" => Output::single(volume::ci(
            s.get("close")?,
            s.get("high")?,
            s.get("low")?,
            s.get("volume")?,
        )?),
        "pvi" => Output::single(volume::pvi(s.get("close")?, s.get("volume")?)?),
        "nvi" => Output::single(volume::nvi(s.get("close")?, s.get("volume")?)?),

        pattern => Output::Flags(detect(pattern, s, p)?),
    };
    Ok(output)
}

fn detect(name: &str, s: &Series, p: &Params) -> anyhow::Result<Vec<bool>> {
    let candles = Candles::new(s.get("open")?, s.get("high")?, s.get("low")?, s.get("close")?)?;
    let trend_period = || p.period("trend_period", DEFAULT_TREND_PERIOD);
    let shadow_margin = || p.float("shadow_margin", DEFAULT_SHADOW_MARGIN);
    let pattern = || p.option("type", PatternType::Bull);

    let hits = match name {
        "hammer" => patterns::hammer(&candles, trend_period()?, shadow_margin()?)?,
        "inverted_hammer" => patterns::inverted_hammer(&candles, trend_period()?, shadow_margin()?)?,
        "doji" => patterns::doji(&candles)?,
        "dragonfly_doji" => patterns::dragonfly_doji(&candles, p.float("bottom_shadow", DEFAULT_BOTTOM_SHADOW)?)?,
        "marubozu" => patterns::marubozu(&candles, pattern()?, shadow_margin()?)?,
        "spinning_top" => patterns::spinning_top(&candles, pattern()?)?,
        "engulfing" => patterns::engulfing(&candles, pattern()?, trend_period()?)?,
        "harami" => patterns::harami(&candles, pattern()?, trend_period()?)?,
        "kicking" => patterns::kicking(&candles, pattern()?, shadow_margin()?)?,
        "piercing" => patterns::piercing(&candles, trend_period()?)?,
        "three_white_soldiers" => patterns::three_white_soldiers(&candles, trend_period()?)?,
        "abandoned_baby" => patterns::abandoned_baby(&candles, pattern()?, trend_period()?)?,
        "belt_hold" => patterns::belt_hold(&candles, pattern()?, trend_period()?, shadow_margin()?)?,
        other => bail!("unknown indicator `{}`", other),
    };
    Ok(hits)
}
