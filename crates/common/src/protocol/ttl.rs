use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Unit symbols, longest first so "ms" is never read as minutes.
const UNITS: &[(&str, f64)] = &[
    ("ns", 1e-9),
    ("us", 1e-6),
    ("µs", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3600.0),
];

/// Retention window for a queued envelope.
///
/// Carried on the wire as a compact duration string such as "30s" or
/// "1h30m". A zero value means the envelope is kept until overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ttl(Duration);

impl Ttl {
    pub const ZERO: Ttl = Ttl(Duration::ZERO);

    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// The expiry window this ttl implies, if it implies one at all.
    pub fn expires_in(self) -> Option<Duration> {
        if self.0.is_zero() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl FromStr for Ttl {
    type Err = TtlParseError;

    /// Parse a duration string: one or more number/unit pairs, e.g.
    /// "300ms", "1.5h" or "2h45m". Bare "0" is accepted without a unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(TtlParseError::Empty);
        }
        if text == "0" {
            return Ok(Ttl::ZERO);
        }

        let mut total = Duration::ZERO;
        let mut rest = text;
        while !rest.is_empty() {
            let split = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .ok_or_else(|| TtlParseError::MissingUnit(text.to_owned()))?;
            if split == 0 {
                return Err(TtlParseError::InvalidNumber(text.to_owned()));
            }
            let value: f64 = rest[..split]
                .parse()
                .map_err(|_| TtlParseError::InvalidNumber(text.to_owned()))?;
            rest = &rest[split..];

            let (unit, consumed) = match_unit(rest)
                .ok_or_else(|| TtlParseError::UnknownUnit(text.to_owned()))?;
            rest = &rest[consumed..];

            let part = Duration::try_from_secs_f64(value * unit)
                .map_err(|_| TtlParseError::OutOfRange(text.to_owned()))?;
            total = total
                .checked_add(part)
                .ok_or_else(|| TtlParseError::OutOfRange(text.to_owned()))?;
        }
        Ok(Ttl(total))
    }
}

fn match_unit(rest: &str) -> Option<(f64, usize)> {
    UNITS
        .iter()
        .find(|(symbol, _)| rest.starts_with(symbol))
        .map(|(symbol, seconds)| (*seconds, symbol.len()))
}

impl fmt::Display for Ttl {
    /// Canonical compact form: nonzero components largest unit first,
    /// "0s" for zero. `parse(x.to_string()) == x` holds for any value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0s");
        }
        const NANOS_PER: &[(&str, u128)] = &[
            ("h", 3_600_000_000_000),
            ("m", 60_000_000_000),
            ("s", 1_000_000_000),
            ("ms", 1_000_000),
            ("us", 1_000),
            ("ns", 1),
        ];
        let mut nanos = self.0.as_nanos();
        for &(symbol, per) in NANOS_PER {
            let count = nanos / per;
            if count > 0 {
                write!(f, "{count}{symbol}")?;
                nanos -= count * per;
            }
        }
        Ok(())
    }
}

impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TtlParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit in duration {0:?}")]
    UnknownUnit(String),
    #[error("duration {0:?} out of range")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl(s: &str) -> Ttl {
        s.parse().unwrap_or_else(|e| panic!("parse {s:?}: {e}"))
    }

    #[test]
    fn test_parses_single_units() {
        assert_eq!(ttl("500ns").duration(), Duration::from_nanos(500));
        assert_eq!(ttl("250us").duration(), Duration::from_micros(250));
        assert_eq!(ttl("250µs").duration(), Duration::from_micros(250));
        assert_eq!(ttl("100ms").duration(), Duration::from_millis(100));
        assert_eq!(ttl("30s").duration(), Duration::from_secs(30));
        assert_eq!(ttl("5m").duration(), Duration::from_secs(300));
        assert_eq!(ttl("24h").duration(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_parses_compound_durations() {
        assert_eq!(ttl("1h30m").duration(), Duration::from_secs(5_400));
        assert_eq!(ttl("2h45m30s").duration(), Duration::from_secs(9_930));
        assert_eq!(ttl("1m30s500ms").duration(), Duration::from_millis(90_500));
    }

    #[test]
    fn test_parses_fractional_values() {
        assert_eq!(ttl("1.5h").duration(), Duration::from_secs(5_400));
        assert_eq!(ttl("0.5s").duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_bare_zero_is_no_expiry() {
        assert_eq!(ttl("0"), Ttl::ZERO);
        assert!(ttl("0").is_zero());
        assert_eq!(ttl("0").expires_in(), None);
        assert_eq!(ttl("0s"), Ttl::ZERO);
    }

    #[test]
    fn test_nonzero_implies_expiry_window() {
        assert_eq!(ttl("2s").expires_in(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!("".parse::<Ttl>(), Err(TtlParseError::Empty));
        assert_eq!(
            "90".parse::<Ttl>(),
            Err(TtlParseError::MissingUnit("90".into()))
        );
        assert_eq!(
            "5x".parse::<Ttl>(),
            Err(TtlParseError::UnknownUnit("5x".into()))
        );
        assert_eq!(
            "h".parse::<Ttl>(),
            Err(TtlParseError::InvalidNumber("h".into()))
        );
        assert_eq!(
            "-5m".parse::<Ttl>(),
            Err(TtlParseError::InvalidNumber("-5m".into()))
        );
        assert_eq!(
            "1hm".parse::<Ttl>(),
            Err(TtlParseError::InvalidNumber("1hm".into()))
        );
    }

    #[test]
    fn test_huge_durations_do_not_panic() {
        assert_eq!(
            "99999999999999999999999h".parse::<Ttl>(),
            Err(TtlParseError::OutOfRange(
                "99999999999999999999999h".into()
            ))
        );
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(Ttl::ZERO.to_string(), "0s");
        assert_eq!(ttl("100ms").to_string(), "100ms");
        assert_eq!(ttl("5m").to_string(), "5m");
        assert_eq!(ttl("90m").to_string(), "1h30m");
        assert_eq!(ttl("1.5h").to_string(), "1h30m");
        assert_eq!(ttl("1m30s500ms").to_string(), "1m30s500ms");
    }

    #[test]
    fn test_display_parse_roundtrip() {
        for text in ["0", "750ns", "100ms", "30s", "5m", "1h30m", "2h45m30s"] {
            let parsed = ttl(text);
            assert_eq!(parsed.to_string().parse::<Ttl>().unwrap(), parsed);
        }
    }

    #[test]
    fn test_serde_uses_duration_strings() {
        let json = serde_json::to_string(&ttl("1h30m")).unwrap();
        assert_eq!(json, "\"1h30m\"");

        let back: Ttl = serde_json::from_str("\"100ms\"").unwrap();
        assert_eq!(back, ttl("100ms"));

        assert!(serde_json::from_str::<Ttl>("\"5x\"").is_err());
    }
}
