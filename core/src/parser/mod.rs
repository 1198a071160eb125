//! Parsers from server JSON to entities.
//!
//! # Design
//! One parser per entity shape, all behind [`Parser`]. A parser first reads
//! every field out of the [`SafeJson`] (required fields through
//! `require_*`, so their absence is a `ParseError`; optional ones through
//! `get`/`get_opt`, so they fall back), then folds the values into the
//! entity's builder. Builder rejections come back as
//! `ParseError::Invalid` carrying the offending object. Parsers do no I/O.
//!
//! Events are polymorphic and go through [`EventParser::for_json`], which
//! selects the parser from the `type` tag.

pub mod address;
pub mod establishment;
pub mod event;
pub mod location;
pub mod user;

use crate::error::{InvalidArgument, ParseError};
use crate::json::SafeJson;

pub use address::AddressParser;
pub use establishment::EstablishmentParser;
pub use event::{parse_event, EventCommonParser, EventParser, SpeedDatingEventParser};
pub use location::LocationParser;
pub use user::UserParser;

pub trait Parser {
    type Output;

    fn parse(&self, json: &SafeJson) -> Result<Self::Output, ParseError>;
}

/// Field names agreed with the server.
pub mod tags {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const DESCRIPTION: &str = "description";

    pub const STREET: &str = "street";
    pub const NUMBER: &str = "number";
    pub const ZIP_CODE: &str = "zip_code";
    pub const CITY: &str = "city";
    pub const PROVINCE: &str = "province";
    pub const COUNTRY: &str = "country";

    pub const ADDRESS: &str = "address";
    pub const PHONE_NUMBER: &str = "phone_number";
    pub const URL: &str = "url";
    pub const MAX_SEATS: &str = "max_seats";
    pub const LOGO_PATH: &str = "logo_path";

    pub const LOCATION: &str = "location";
    pub const MAX_PEOPLE: &str = "max_people";
    pub const DATE_BEGIN: &str = "date_begin";
    pub const DATE_END: &str = "date_end";
    pub const BASE_PRICE: &str = "base_price";
    pub const STATE: &str = "state";
    pub const IMAGE_PATH: &str = "image_path";
    pub const LAST_UPDATE: &str = "last_update";
    pub const MEN_SEATS: &str = "men_seats";
    pub const WOMEN_SEATS: &str = "women_seats";
    pub const MEN_REGISTERED: &str = "men_registered";
    pub const WOMEN_REGISTERED: &str = "women_registered";
    pub const MIN_AGE: &str = "min_age";
    pub const MAX_AGE: &str = "max_age";
    pub const ESTABLISHMENT: &str = "establishment";

    pub const FACEBOOK_ID: &str = "facebook_id";
    pub const USERNAME: &str = "username";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const HOME_PHONE: &str = "home_phone";
    pub const MOBILE_PHONE: &str = "mobile_phone";
    pub const EMAIL: &str = "email";
    pub const PROFESSION: &str = "profession";
    pub const LOCKED: &str = "locked";
    pub const ENABLED: &str = "enabled";
    pub const GENDER: &str = "gender";
    pub const BIRTH_DATE: &str = "birth_date";
    pub const LOCATIONS_OF_INTEREST: &str = "locations_of_interest";
    pub const EVENTS_ATTENDED: &str = "events_attended";
}

/// Attach the object being parsed to a builder rejection.
pub(crate) fn invalid(json: &SafeJson, source: InvalidArgument) -> ParseError {
    ParseError::Invalid {
        source,
        fragment: json.to_string(),
    }
}

/// Convert the elements of a JSON array into objects, in order.
pub(crate) fn objects(items: &[serde_json::Value]) -> Result<Vec<SafeJson>, ParseError> {
    items.iter().cloned().map(SafeJson::try_from).collect()
}
