use super::{PropertyMapper, PropertyMappingConfiguration, TypeConverter};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use stratum_core::{schema::Type, stmt::Value, Error, Result};

/// Converts strings, timestamps and `{ date, dateFormat }` maps to
/// DateTime values.
///
/// Strings are parsed as RFC 3339 unless a format is configured. Formats
/// without an offset are read as UTC.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeConverter;

impl TypeConverter for DateTimeConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["string", "integer", "array"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::DateTime
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_convert_from(&self, source: &Value, _: &Type, _: &PropertyMapper) -> bool {
        match source {
            Value::Map(map) => map.contains_key("date"),
            Value::List(_) => false,
            _ => true,
        }
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        config: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        let (date, format) = match source {
            Value::I64(timestamp) => {
                return DateTime::from_timestamp(*timestamp, 0)
                    .map(|date_time| Value::DateTime(date_time.fixed_offset()))
                    .ok_or_else(|| Error::invalid_source(format!("timestamp {timestamp} is out of range")));
            }
            Value::Map(map) => (
                map.get("date").and_then(Value::to_plain_string).unwrap_or_default(),
                map.get("dateFormat")
                    .and_then(Value::to_plain_string)
                    .or_else(|| config.date_format().map(str::to_string)),
            ),
            other => (
                other.to_plain_string().unwrap_or_default(),
                config.date_format().map(str::to_string),
            ),
        };

        if date.is_empty() {
            return Ok(Value::Null);
        }

        parse(&date, format.as_deref())
            .map(Value::DateTime)
            .ok_or_else(|| {
                Error::invalid_source(format!(
                    "the date `{date}` was not recognized (for format `{}`)",
                    format.as_deref().unwrap_or("RFC 3339")
                ))
            })
    }
}

fn parse(date: &str, format: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let Some(format) = format else {
        return DateTime::parse_from_rfc3339(date).ok();
    };

    DateTime::parse_from_str(date, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date, format)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(date, format)
                .ok()
                .map(|naive| naive.and_time(NaiveTime::default()).and_utc().fixed_offset())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        let expected = DateTime::parse_from_rfc3339("2024-05-06T00:00:00+00:00").unwrap();

        assert_eq!(parse("2024-05-06T00:00:00+00:00", None), Some(expected));
        assert_eq!(parse("06.05.2024", Some("%d.%m.%Y")), Some(expected));
        assert_eq!(parse("2024-05-06 00:00", Some("%Y-%m-%d %H:%M")), Some(expected));
        assert_eq!(parse("yesterday", None), None);
    }
}
