//! Local wall-clock timestamps at second resolution, stored as `YYYY-MM-DD HH:MM:SS`.
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Drops sub-second precision so that formatting and parsing agree.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|e| {
            serde::de::Error::custom(format!("invalid timestamp '{}': {}", text, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let ts = Timestamp::parse("2024-01-01 10:00:00").unwrap();
        assert_eq!(ts.to_string(), "2024-01-01 10:00:00");
    }

    #[test]
    fn test_chronological_ordering() {
        let earlier: Timestamp = "2024-01-01 10:00:00".parse().unwrap();
        let later: Timestamp = "2024-01-02 09:00:00".parse().unwrap();
        assert!(earlier < later);
        assert!(None < Some(earlier));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(serde_json::from_str::<Timestamp>("\"2024-13-01 00:00:00\"").is_err());
    }

    #[test]
    fn test_now_has_second_resolution() {
        let now = Timestamp::now();
        assert_eq!(now.as_naive().nanosecond(), 0);
        assert_eq!(Timestamp::parse(&now.to_string()).unwrap(), now);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let ts = Timestamp::parse("2024-01-02 09:00:00").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-01-02 09:00:00\"");
    }
}
