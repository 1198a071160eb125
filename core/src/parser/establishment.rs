use super::tags::{ADDRESS, DESCRIPTION, ID, LOGO_PATH, MAX_SEATS, NAME, PHONE_NUMBER, TYPE, URL};
use super::{invalid, AddressParser, Parser};
use crate::error::ParseError;
use crate::json::SafeJson;
use crate::model::{Establishment, EstablishmentBuilder, EstablishmentType, DEFAULT_ADDRESS};

/// An establishment without an `address` object gets [`DEFAULT_ADDRESS`];
/// one that has an address object must carry a valid one.
#[derive(Debug, Default, Clone, Copy)]
pub struct EstablishmentParser;

impl Parser for EstablishmentParser {
    type Output = Establishment;

    fn parse(&self, json: &SafeJson) -> Result<Establishment, ParseError> {
        let id = json.require_i64(ID)?;
        let name = json.require_str(NAME)?;
        let type_tag = json.require_str(TYPE)?;
        let kind = EstablishmentType::from_tag(type_tag).ok_or_else(|| ParseError::UnknownValue {
            field: TYPE,
            value: type_tag.to_string(),
        })?;
        let phone_number = json.require_str(PHONE_NUMBER)?;
        let max_seats = json.require_i64(MAX_SEATS)?;
        let address = match json.get_opt::<SafeJson>(ADDRESS) {
            Some(address) => AddressParser.parse(&address)?,
            None => DEFAULT_ADDRESS,
        };

        EstablishmentBuilder::new()
            .id(id)
            .and_then(|b| b.name(name))
            .and_then(|b| b.kind(Some(kind)))
            .and_then(|b| b.phone_number(phone_number))
            .and_then(|b| b.max_seats(max_seats))
            .and_then(|b| {
                b.address(address)
                    .description(json.get_opt(DESCRIPTION))
                    .url(json.get_opt(URL))
                    .logo_path(json.get_opt(LOGO_PATH))
                    .build()
            })
            .map_err(|source| invalid(json, source))
    }
}
