//! Event parsing and the `type`-driven parser factory.

use super::tags::{
    BASE_PRICE, DATE_BEGIN, DATE_END, DESCRIPTION, ESTABLISHMENT, ID, IMAGE_PATH, LAST_UPDATE, LOCATION,
    MAX_AGE, MAX_PEOPLE, MEN_REGISTERED, MEN_SEATS, MIN_AGE, NAME, STATE, TYPE, WOMEN_REGISTERED, WOMEN_SEATS,
};
use super::{invalid, EstablishmentParser, LocationParser, Parser};
use crate::date;
use crate::error::ParseError;
use crate::json::SafeJson;
use crate::model::{Event, EventBuilder, EventKind, SpeedDatingBuilder};

/// Reads the fields every event kind shares into an [`EventBuilder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EventCommonParser;

impl Parser for EventCommonParser {
    type Output = EventBuilder;

    fn parse(&self, json: &SafeJson) -> Result<EventBuilder, ParseError> {
        let id = json.require_i64(ID)?;
        let name = json.require_str(NAME)?;
        let location = LocationParser.parse(&json.require_object(LOCATION)?)?;
        let max_people = json.require_i64(MAX_PEOPLE)?;
        let date_begin = date::parse(json.require_str(DATE_BEGIN)?)?;
        let date_end = date::parse(json.require_str(DATE_END)?)?;
        let base_price = json.require_f64(BASE_PRICE)?;
        let state = json.require_str(STATE)?;
        // Optional, but a date that is present must be well formed.
        let last_update = json
            .get_opt::<String>(LAST_UPDATE)
            .map(|value| date::parse(&value))
            .transpose()?;

        EventBuilder::new()
            .id(id)
            .and_then(|b| b.name(name))
            .and_then(|b| b.max_people(max_people))
            .and_then(|b| b.base_price(base_price))
            .and_then(|b| b.state(state))
            .map(|b| {
                b.location(location)
                    .date_begin(date_begin)
                    .date_end(date_end)
                    .description(json.get(DESCRIPTION, String::new()))
                    .image_path(json.get(IMAGE_PATH, String::new()))
                    .last_update(last_update)
            })
            .map_err(|source| invalid(json, source))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SpeedDatingEventParser;

impl Parser for SpeedDatingEventParser {
    type Output = Event;

    fn parse(&self, json: &SafeJson) -> Result<Event, ParseError> {
        let common = EventCommonParser.parse(json)?;
        let men_seats = json.require_i64(MEN_SEATS)?;
        let women_seats = json.require_i64(WOMEN_SEATS)?;
        let min_age = json.require_i64(MIN_AGE)?;
        let max_age = json.require_i64(MAX_AGE)?;
        let establishment = EstablishmentParser.parse(&json.require_object(ESTABLISHMENT)?)?;

        SpeedDatingBuilder::new()
            .men_seats(men_seats)
            .and_then(|b| b.women_seats(women_seats))
            .and_then(|b| b.men_registered(json.get(MEN_REGISTERED, 0_i64)))
            .and_then(|b| b.women_registered(json.get(WOMEN_REGISTERED, 0_i64)))
            .and_then(|b| b.min_age(min_age))
            .and_then(|b| b.max_age(max_age))
            .and_then(|b| b.establishment(establishment).build())
            .and_then(|speed_dating| common.build(EventKind::SpeedDating(speed_dating)))
            .map_err(|source| invalid(json, source))
    }
}

/// Parser for one event kind, chosen from the JSON `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventParser {
    SpeedDating,
}

impl EventParser {
    /// The parser factory: every event goes through here, so a new kind
    /// needs one more arm and nothing else at the call sites.
    pub fn for_json(json: &SafeJson) -> Result<Self, ParseError> {
        match json.require_str(TYPE)? {
            EventKind::SPEED_DATING => Ok(Self::SpeedDating),
            other => Err(ParseError::UnknownType(other.to_string())),
        }
    }
}

impl Parser for EventParser {
    type Output = Event;

    fn parse(&self, json: &SafeJson) -> Result<Event, ParseError> {
        match self {
            Self::SpeedDating => SpeedDatingEventParser.parse(json),
        }
    }
}

/// Select the parser for `json` and run it.
pub fn parse_event(json: &SafeJson) -> Result<Event, ParseError> {
    let event = EventParser::for_json(json)?.parse(json)?;
    tracing::debug!(id = event.id(), kind = event.kind().tag(), "parsed event");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use super::*;
    use crate::error::InvalidArgument;

    fn speed_dating_json() -> Value {
        json!({
            "type": "speed_dating",
            "id": 2,
            "name": "Soirée speed dating 30-40 ans",
            "location": {"id": 3, "name": "Lausanne"},
            "max_people": 20,
            "date_begin": "2015-12-24T19:00:00+0100",
            "date_end": "2015-12-24T23:00:00+0100",
            "base_price": 25,
            "state": "pending",
            "description": "Une soirée pour faire des rencontres.",
            "image_path": "images/events/2.jpg",
            "last_update": "2015-11-30T10:20:00+0100",
            "men_seats": 10,
            "women_seats": 10,
            "men_registered": 3,
            "women_registered": 5,
            "min_age": 30,
            "max_age": 40,
            "establishment": {
                "id": 1,
                "name": "Hôtel Beau-Rivage",
                "type": "hotel",
                "address": {"street": "Place du Port", "number": 17, "zip_code": 1006, "city": "Lausanne"},
                "phone_number": "021 613 33 33",
                "max_seats": 60
            }
        })
    }

    fn safe(value: Value) -> SafeJson {
        SafeJson::try_from(value).unwrap()
    }

    #[test]
    fn factory_selects_the_speed_dating_parser() {
        let json = safe(speed_dating_json());
        assert_eq!(EventParser::for_json(&json).unwrap(), EventParser::SpeedDating);
        let event = parse_event(&json).unwrap();
        assert_eq!(event.kind().tag(), "speed_dating");
        assert_eq!(event.as_speed_dating().unwrap().women_registered(), 5);
        assert_eq!(event.base_price().value(), 25.0);
    }

    #[test]
    fn factory_rejects_unknown_tags() {
        let mut value = speed_dating_json();
        value["type"] = json!("wine_tasting");
        let err = EventParser::for_json(&safe(value)).unwrap_err();
        assert_eq!(err.to_string(), "unknown type: wine_tasting");
    }

    #[test]
    fn factory_requires_a_tag() {
        let mut value = speed_dating_json();
        value.as_object_mut().unwrap().remove("type");
        assert!(matches!(
            parse_event(&safe(value)),
            Err(ParseError::MissingField(f)) if f == "type"
        ));
    }

    #[test]
    fn round_trips_through_serialization() {
        let event = parse_event(&safe(speed_dating_json())).unwrap();
        let back = parse_event(&safe(serde_json::to_value(&event).unwrap())).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let mut value = speed_dating_json();
        let object = value.as_object_mut().unwrap();
        for field in ["description", "image_path", "last_update", "men_registered"] {
            object.remove(field);
        }
        let event = parse_event(&safe(value)).unwrap();
        assert_eq!(event.description(), "");
        assert!(event.last_update().is_none());
        assert_eq!(event.as_speed_dating().unwrap().men_registered(), 0);
    }

    #[test]
    fn malformed_last_update_is_not_defaulted() {
        let mut value = speed_dating_json();
        value["last_update"] = json!("30.11.2015");
        assert!(matches!(parse_event(&safe(value)), Err(ParseError::Date { .. })));
    }

    #[test]
    fn missing_required_field_is_not_defaulted() {
        let mut value = speed_dating_json();
        value.as_object_mut().unwrap().remove("max_people");
        assert!(matches!(
            parse_event(&safe(value)),
            Err(ParseError::MissingField(f)) if f == "max_people"
        ));
    }

    #[test]
    fn inverted_age_band_is_rejected() {
        let mut value = speed_dating_json();
        value["min_age"] = json!(45);
        let err = parse_event(&safe(value)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Invalid { source: InvalidArgument::AgeRange { min: 45, max: 40 }, .. }
        ));
    }

    proptest! {
        #[test]
        fn builder_dates_survive_a_round_trip(
            begin in 0i64..4_102_444_800,
            length in 0i64..86_400,
            nanos in 0u32..1_000_000_000,
        ) {
            let json = safe(speed_dating_json());
            let parsed = parse_event(&json).unwrap();
            let speed_dating = parsed.as_speed_dating().unwrap().clone();
            let date_begin = Utc.timestamp_opt(begin, nanos).unwrap();
            let date_end = Utc.timestamp_opt(begin + length, nanos).unwrap();

            let event = EventCommonParser
                .parse(&json)
                .unwrap()
                .date_begin(date_begin)
                .date_end(date_end)
                .last_update(Some(date_end))
                .build(EventKind::SpeedDating(speed_dating))
                .unwrap();
            let back = parse_event(&safe(serde_json::to_value(&event).unwrap())).unwrap();
            prop_assert_eq!(back, event);
        }
    }
}
