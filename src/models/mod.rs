pub mod entry;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Tells an explicit `null` apart from an absent field in partial updates.
///
/// Use with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)` (clear the field), and a value gives `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Serde helpers for day-precision dates.
///
/// Accepts either `YYYY-MM-DD` or an RFC 3339 timestamp. Timestamps are
/// truncated to the calendar date in their own offset.
pub mod calendar_day {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.date_naive())
            .map_err(|_| format!("invalid date `{raw}` (expected YYYY-MM-DD)"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw))
            .transpose()
            .map_err(serde::de::Error::custom)
    }

    /// Same as [`deserialize_option`], but keeps `null` distinct from absent
    /// (see [`super::nullable`]).
    pub fn deserialize_nullable<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_option(deserializer).map(Some)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_plain_date() {
            assert_eq!(
                parse("2024-01-29").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 29).unwrap()
            );
        }

        #[test]
        fn test_parse_timestamp_drops_time_of_day() {
            assert_eq!(
                parse("2024-01-29T23:59:59Z").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 29).unwrap()
            );
            // Date is taken in the timestamp's own offset, not UTC
            assert_eq!(
                parse("2024-01-29T23:30:00-05:00").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 29).unwrap()
            );
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(parse("yesterday").is_err());
            assert!(parse("2024-13-01").is_err());
        }

        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_nullable")]
            day: Option<Option<NaiveDate>>,
        }

        #[test]
        fn test_nullable_day_separates_null_from_absent() {
            let absent: Patch = serde_json::from_str("{}").unwrap();
            assert_eq!(absent.day, None);

            let cleared: Patch = serde_json::from_str(r#"{"day":null}"#).unwrap();
            assert_eq!(cleared.day, Some(None));

            let set: Patch = serde_json::from_str(r#"{"day":"2024-02-01"}"#).unwrap();
            assert_eq!(set.day, Some(NaiveDate::from_ymd_opt(2024, 2, 1)));

            assert!(serde_json::from_str::<Patch>(r#"{"day":"soon"}"#).is_err());
        }
    }
}
