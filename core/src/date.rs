//! Conversion between wire dates and `DateTime<Utc>`.
//!
//! The server writes ISO-8601 timestamps with a numeric offset and no
//! colon, e.g. `1993-02-18T00:00:00+0100`. Internally every date is kept in
//! UTC; serialization writes the UTC instant back in the same format.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serializer;

use crate::error::ParseError;

pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub fn parse(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_str(value, WIRE_FORMAT)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|source| ParseError::Date {
            value: value.to_string(),
            source,
        })
}

/// Drop the sub-second part, which the wire format cannot carry.
pub fn to_wire_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(0)
}

pub fn format(date: &DateTime<Utc>) -> String {
    date.format(WIRE_FORMAT).to_string()
}

pub(crate) fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(date))
}

pub(crate) fn serialize_opt<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serialize(date, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_offset_dates_into_utc() {
        let date = parse("1993-02-18T00:00:00+0100").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(1993, 2, 17, 23, 0, 0).unwrap());
    }

    #[test]
    fn formats_in_wire_format() {
        let date = Utc.with_ymd_and_hms(2015, 12, 24, 19, 30, 0).unwrap();
        assert_eq!(format(&date), "2015-12-24T19:30:00+0000");
        assert_eq!(parse(&format(&date)).unwrap(), date);
    }

    #[test]
    fn wire_precision_drops_fractions() {
        let date = Utc.with_ymd_and_hms(2015, 12, 24, 19, 0, 0).unwrap() + chrono::Duration::milliseconds(500);
        let whole = to_wire_precision(date);
        assert_eq!(whole, Utc.with_ymd_and_hms(2015, 12, 24, 19, 0, 0).unwrap());
        assert_eq!(parse(&format(&whole)).unwrap(), whole);
    }

    #[test]
    fn rejects_form_style_dates() {
        let err = parse("18/02/1993").unwrap_err();
        assert!(matches!(err, ParseError::Date { ref value, .. } if value == "18/02/1993"));
    }
}
