use super::tags::{CITY, COUNTRY, NUMBER, PROVINCE, STREET, ZIP_CODE};
use super::{invalid, Parser};
use crate::error::ParseError;
use crate::json::SafeJson;
use crate::model::{Address, AddressBuilder};

/// Street and city are required; the rest fall back to zero or empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddressParser;

impl Parser for AddressParser {
    type Output = Address;

    fn parse(&self, json: &SafeJson) -> Result<Address, ParseError> {
        let street = json.require_str(STREET)?;
        let city = json.require_str(CITY)?;
        let number = json.get(NUMBER, 0_i64);
        let zip_code = json.get(ZIP_CODE, 0_i64);
        let province = json.get(PROVINCE, String::new());
        let country = json.get(COUNTRY, String::new());

        AddressBuilder::new()
            .street(street)
            .and_then(|b| b.city(city))
            .and_then(|b| b.number(number))
            .and_then(|b| b.zip_code(zip_code))
            .and_then(|b| b.province(province).country(country).build())
            .map_err(|source| invalid(json, source))
    }
}
