use super::tags::{ID, NAME};
use super::{invalid, Parser};
use crate::error::ParseError;
use crate::json::SafeJson;
use crate::model::{Location, LocationBuilder};

#[derive(Debug, Default, Clone, Copy)]
pub struct LocationParser;

impl Parser for LocationParser {
    type Output = Location;

    fn parse(&self, json: &SafeJson) -> Result<Location, ParseError> {
        let id = json.require_i64(ID)?;
        let name = json.require_str(NAME)?;

        LocationBuilder::new()
            .id(id)
            .and_then(|b| b.name(name))
            .and_then(LocationBuilder::build)
            .map_err(|source| invalid(json, source))
    }
}
