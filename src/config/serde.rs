use std::fmt;
use std::time::Duration;

use humantime::parse_duration;
use serde::de::{self, Visitor};
use serde_with::DeserializeAs;

/// Reads a duration given as milliseconds (integer, float or numeric string) or as
/// a humantime string such as `"4s"`.
pub(crate) struct Millis;

impl<'de> DeserializeAs<'de, Duration> for Millis {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(MillisVisitor)
    }
}

/// Reads a duration given only as a JSON-style number of milliseconds. Strings,
/// even numeric ones, are rejected.
pub(crate) struct NumericMillis;

impl<'de> DeserializeAs<'de, Duration> for NumericMillis {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(NumericMillisVisitor)
    }
}

struct NumericMillisVisitor;

impl Visitor<'_> for NumericMillisVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a non-negative number of milliseconds")
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        MillisVisitor.visit_u64(value)
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        MillisVisitor.visit_i64(value)
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        MillisVisitor.visit_f64(value)
    }
}

struct MillisVisitor;

impl Visitor<'_> for MillisVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a non-negative number of milliseconds or a duration string")
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        Ok(Duration::from_millis(value))
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map(Duration::from_millis)
            .map_err(|_| E::custom(format!("negative duration: {value}")))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        if !value.is_finite() || value < 0.0 {
            return Err(E::custom(format!("invalid duration: {value}")));
        }
        Duration::try_from_secs_f64(value / 1_000.0).map_err(E::custom)
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Duration, E>
    where
        E: de::Error,
    {
        let trimmed = value.trim();
        if let Ok(ms) = trimmed.parse::<f64>() {
            return self.visit_f64(ms);
        }
        parse_duration(trimmed).map_err(E::custom)
    }
}
