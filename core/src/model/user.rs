use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_empty, non_negative, required, Event, Location};
use crate::date;
use crate::error::InvalidArgument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::Male, Self::Female]
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(tag))
    }
}

/// A registered member, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct User {
    id: u32,
    facebook_id: String,
    username: String,
    first_name: String,
    last_name: String,
    home_phone: String,
    mobile_phone: String,
    email: String,
    address: String,
    profession: String,
    locked: bool,
    enabled: bool,
    gender: Gender,
    #[serde(serialize_with = "date::serialize")]
    birth_date: DateTime<Utc>,
    #[serde(rename = "locations_of_interest")]
    areas_of_interest: BTreeSet<Location>,
    events_attended: Vec<Event>,
}

impl User {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn facebook_id(&self) -> &str {
        &self.facebook_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn home_phone(&self) -> &str {
        &self.home_phone
    }

    pub fn mobile_phone(&self) -> &str {
        &self.mobile_phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn profession(&self) -> &str {
        &self.profession
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birth_date(&self) -> DateTime<Utc> {
        self.birth_date
    }

    pub fn areas_of_interest(&self) -> &BTreeSet<Location> {
        &self.areas_of_interest
    }

    pub fn events_attended(&self) -> &[Event] {
        &self.events_attended
    }
}

#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<u32>,
    facebook_id: Option<String>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    home_phone: String,
    mobile_phone: String,
    email: Option<String>,
    address: String,
    profession: String,
    locked: Option<bool>,
    enabled: Option<bool>,
    gender: Option<Gender>,
    birth_date: Option<DateTime<Utc>>,
    areas_of_interest: BTreeSet<Location>,
    events_attended: Vec<Event>,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Result<Self, InvalidArgument> {
        self.id = Some(non_negative("id", id)?);
        Ok(self)
    }

    pub fn facebook_id(mut self, facebook_id: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.facebook_id = Some(non_empty("facebook_id", facebook_id)?);
        Ok(self)
    }

    pub fn username(mut self, username: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.username = Some(non_empty("username", username)?);
        Ok(self)
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.first_name = Some(non_empty("first_name", first_name)?);
        Ok(self)
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.last_name = Some(non_empty("last_name", last_name)?);
        Ok(self)
    }

    pub fn home_phone(mut self, home_phone: impl Into<String>) -> Self {
        self.home_phone = home_phone.into();
        self
    }

    pub fn mobile_phone(mut self, mobile_phone: impl Into<String>) -> Self {
        self.mobile_phone = mobile_phone.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Result<Self, InvalidArgument> {
        let email = non_empty("email", email)?;
        if !email.contains('@') {
            return Err(InvalidArgument::Invalid {
                field: "email",
                reason: format!("`{email}` has no domain"),
            });
        }
        self.email = Some(email);
        Ok(self)
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = profession.into();
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Accepts the result of [`Gender::from_tag`] directly.
    pub fn gender(mut self, gender: Option<Gender>) -> Result<Self, InvalidArgument> {
        self.gender = Some(required("gender", gender)?);
        Ok(self)
    }

    pub fn birth_date(mut self, birth_date: DateTime<Utc>) -> Self {
        self.birth_date = Some(date::to_wire_precision(birth_date));
        self
    }

    pub fn areas_of_interest(mut self, areas: impl IntoIterator<Item = Location>) -> Self {
        self.areas_of_interest = areas.into_iter().collect();
        self
    }

    pub fn events_attended(mut self, events: Vec<Event>) -> Self {
        self.events_attended = events;
        self
    }

    pub fn build(self) -> Result<User, InvalidArgument> {
        Ok(User {
            id: required("id", self.id)?,
            facebook_id: required("facebook_id", self.facebook_id)?,
            username: required("username", self.username)?,
            first_name: required("first_name", self.first_name)?,
            last_name: required("last_name", self.last_name)?,
            home_phone: self.home_phone,
            mobile_phone: self.mobile_phone,
            email: required("email", self.email)?,
            address: self.address,
            profession: self.profession,
            locked: required("locked", self.locked)?,
            enabled: required("enabled", self.enabled)?,
            gender: required("gender", self.gender)?,
            birth_date: required("birth_date", self.birth_date)?,
            areas_of_interest: self.areas_of_interest,
            events_attended: self.events_attended,
        })
    }
}

/// Sign-up form posted to the server. Values are sent exactly as entered;
/// the server validates them and answers with field-keyed errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub facebook_id: String,
    pub plain_password: String,
}

impl NewUser {
    /// Form fields in the order the server declares them. Validation
    /// messages are reported in this order.
    pub const FIELDS: [&'static str; 8] = [
        "email",
        "username",
        "firstName",
        "lastName",
        "gender",
        "birthDate",
        "facebookId",
        "plainPassword",
    ];
}
