//! Lenient decoders for the backend's date, time and enum fields.
//!
//! Dates arrive as `YYYY-MM-DD`, as full date-times, or as `[y, m, d]`
//! arrays depending on the endpoint; all of them collapse to a date-only value.

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn numbers(items: &[Value]) -> Vec<u32> {
    items
        .iter()
        .filter_map(|v| v.as_u64())
        .map(|n| n as u32)
        .collect()
}

pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(raw) => parse_date(raw),
        Value::Array(items) => match numbers(items).as_slice() {
            [y, m, d, ..] => NaiveDate::from_ymd_opt(*y as i32, *m, *d),
            _ => None,
        },
        _ => None,
    }
}

pub fn time_from_value(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::String(raw) => parse_time(raw),
        Value::Array(items) => match numbers(items).as_slice() {
            [h, m] => NaiveTime::from_hms_opt(*h, *m, 0),
            [h, m, s, ..] => NaiveTime::from_hms_opt(*h, *m, *s),
            _ => None,
        },
        _ => None,
    }
}

pub fn date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(date_from_value))
}

pub fn time_opt<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(time_from_value))
}

/// Decodes `T` when possible and yields `None` for nulls or unknown shapes.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dates_strip_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 15);
        assert_eq!(parse_date("2024-02-15"), expected);
        assert_eq!(parse_date("2024-02-15T23:59:00.000Z"), expected);
        assert_eq!(date_from_value(&json!([2024, 2, 15])), expected);
        assert_eq!(parse_date("15/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn times_accept_seconds_or_not() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0);
        assert_eq!(parse_time("09:00"), nine);
        assert_eq!(parse_time("09:00:00"), nine);
        assert_eq!(time_from_value(&json!([9, 0])), nine);
        assert_eq!(parse_time("9am"), None);
    }
}
