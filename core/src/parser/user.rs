use serde_json::Value;

use super::tags::{
    ADDRESS, BIRTH_DATE, EMAIL, ENABLED, EVENTS_ATTENDED, FACEBOOK_ID, FIRST_NAME, GENDER, HOME_PHONE, ID,
    LAST_NAME, LOCATIONS_OF_INTEREST, LOCKED, MOBILE_PHONE, PROFESSION, USERNAME,
};
use super::{invalid, objects, parse_event, LocationParser, Parser};
use crate::date;
use crate::error::ParseError;
use crate::json::SafeJson;
use crate::model::{Gender, User, UserBuilder};

/// Parses a user together with its locations of interest and the events it
/// attended. Each attended event is dispatched on its own `type` tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserParser;

impl Parser for UserParser {
    type Output = User;

    fn parse(&self, json: &SafeJson) -> Result<User, ParseError> {
        let id = json.require_i64(ID)?;
        let facebook_id = json.require_str(FACEBOOK_ID)?;
        let username = json.require_str(USERNAME)?;
        let email = json.require_str(EMAIL)?;
        let first_name = json.require_str(FIRST_NAME)?;
        let last_name = json.require_str(LAST_NAME)?;
        let gender_tag = json.require_str(GENDER)?;
        let gender = Gender::from_tag(gender_tag).ok_or_else(|| ParseError::UnknownValue {
            field: GENDER,
            value: gender_tag.to_string(),
        })?;
        let birth_date = date::parse(json.require_str(BIRTH_DATE)?)?;
        let locked = json.require_bool(LOCKED)?;
        let enabled = json.require_bool(ENABLED)?;

        let areas = objects(&json.get(LOCATIONS_OF_INTEREST, Vec::<Value>::new()))?
            .iter()
            .map(|area| LocationParser.parse(area))
            .collect::<Result<Vec<_>, _>>()?;
        let events = objects(&json.get(EVENTS_ATTENDED, Vec::<Value>::new()))?
            .iter()
            .map(parse_event)
            .collect::<Result<Vec<_>, _>>()?;

        UserBuilder::new()
            .id(id)
            .and_then(|b| b.facebook_id(facebook_id))
            .and_then(|b| b.username(username))
            .and_then(|b| b.email(email))
            .and_then(|b| b.first_name(first_name))
            .and_then(|b| b.last_name(last_name))
            .and_then(|b| b.gender(Some(gender)))
            .and_then(|b| {
                b.birth_date(birth_date)
                    .locked(locked)
                    .enabled(enabled)
                    .home_phone(json.get(HOME_PHONE, String::new()))
                    .mobile_phone(json.get(MOBILE_PHONE, String::new()))
                    .address(json.get(ADDRESS, String::new()))
                    .profession(json.get(PROFESSION, String::new()))
                    .areas_of_interest(areas)
                    .events_attended(events)
                    .build()
            })
            .map_err(|source| invalid(json, source))
    }
}
