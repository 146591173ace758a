//! Enumerated mode selectors.
//!
//! String options are parsed once at the boundary, case-insensitively, and
//! dispatched by exhaustive `match` everywhere else.

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $option:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Accepted spellings, comma separated.
            pub const EXPECTED: &'static str = concat!($($text, ", "),+);

            /// Returns lowercase string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = IndicatorError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => {
                        tracing::debug!(option = $option, value = s, "rejected option");
                        Err(IndicatorError::InvalidOption {
                            name: $option,
                            value: s.to_string(),
                            expected: $name::EXPECTED.trim_end_matches(", "),
                        })
                    }
                }
            }
        }
    };
}

option_enum! {
    /// Moving average used by APO and PPO.
    #[derive(Default)]
    MaType as "ma" {
        /// Simple moving average.
        #[default]
        Sma => "sma",
        /// Exponential moving average.
        Ema => "ema",
    }
}

option_enum! {
    /// RSI averaging of gains and losses.
    #[derive(Default)]
    RsiType as "type" {
        /// Wilder smoothing, seeded with a simple mean.
        #[default]
        Smoothed => "smoothed",
        /// Simple mean over the trailing window.
        Standard => "standard",
    }
}

option_enum! {
    /// Direction of a two-sided candlestick pattern.
    PatternType as "type" {
        Bull => "bull",
        Bear => "bear",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("sma".parse::<MaType>(), Ok(MaType::Sma));
        assert_eq!("EMA".parse::<MaType>(), Ok(MaType::Ema));
        assert_eq!(" Smoothed ".parse::<RsiType>(), Ok(RsiType::Smoothed));
        assert_eq!("Bear".parse::<PatternType>(), Ok(PatternType::Bear));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "wma".parse::<MaType>().unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InvalidOption {
                name: "ma",
                value: "wma".to_string(),
                expected: "sma, ema",
            }
        );
        assert!("sideways".parse::<PatternType>().is_err());
        assert!("".parse::<RsiType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for ma in [MaType::Sma, MaType::Ema] {
            assert_eq!(ma.to_string().parse::<MaType>(), Ok(ma));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(MaType::default(), MaType::Sma);
        assert_eq!(RsiType::default(), RsiType::Smoothed);
    }
}
