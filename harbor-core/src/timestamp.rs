use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseResult};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a navigation timestamp into an instant.
///
/// RFC 3339 and ISO 8601 strings with an explicit offset keep their offset,
/// timestamps without one get a `+00:00` offset.
pub fn parse_timestamp(value: &str) -> ParseResult<DateTime<FixedOffset>> {
    let value = value.trim();

    let mut error = match DateTime::parse_from_rfc3339(value) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };

    for format in OFFSET_FORMATS {
        match DateTime::parse_from_str(value, format) {
            Ok(v) => return Ok(v),
            Err(e) => error = e,
        }
    }

    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(value, format) {
            Ok(v) => return Ok(v.and_utc().fixed_offset()),
            Err(e) => error = e,
        }
    }

    Err(error)
}
