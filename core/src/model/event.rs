//! Events: a common record plus a closed set of event kinds.
//!
//! Fields every event has live on [`Event`]; what a particular kind adds is
//! carried by the [`EventKind`] variant, tagged on the wire by `type`.
//! Adding a kind means adding a variant here, its builder, and one arm in
//! the parser factory.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{non_empty, non_negative, required, Establishment, Location, Price};
use crate::date;
use crate::error::InvalidArgument;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    id: u32,
    name: String,
    location: Location,
    max_people: u32,
    #[serde(serialize_with = "date::serialize")]
    date_begin: DateTime<Utc>,
    #[serde(serialize_with = "date::serialize")]
    date_end: DateTime<Utc>,
    base_price: Price,
    state: String,
    description: String,
    image_path: String,
    #[serde(serialize_with = "date::serialize_opt")]
    last_update: Option<DateTime<Utc>>,
    #[serde(flatten)]
    kind: EventKind,
}

/// Kind-specific part of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum EventKind {
    #[serde(rename = "speed_dating")]
    SpeedDating(SpeedDating),
}

impl EventKind {
    pub const SPEED_DATING: &'static str = "speed_dating";

    /// The wire `type` tag of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SpeedDating(_) => Self::SPEED_DATING,
        }
    }
}

impl Event {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn max_people(&self) -> u32 {
        self.max_people
    }

    pub fn date_begin(&self) -> DateTime<Utc> {
        self.date_begin
    }

    pub fn date_end(&self) -> DateTime<Utc> {
        self.date_end
    }

    pub fn base_price(&self) -> Price {
        self.base_price
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn as_speed_dating(&self) -> Option<&SpeedDating> {
        match &self.kind {
            EventKind::SpeedDating(speed_dating) => Some(speed_dating),
        }
    }
}

/// Stages the fields shared by every event kind. The kind is supplied at
/// [`EventBuilder::build`].
#[derive(Debug, Default)]
pub struct EventBuilder {
    id: Option<u32>,
    name: Option<String>,
    location: Option<Location>,
    max_people: Option<u32>,
    date_begin: Option<DateTime<Utc>>,
    date_end: Option<DateTime<Utc>>,
    base_price: Option<Price>,
    state: Option<String>,
    description: String,
    image_path: String,
    last_update: Option<DateTime<Utc>>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Result<Self, InvalidArgument> {
        self.id = Some(non_negative("id", id)?);
        Ok(self)
    }

    pub fn name(mut self, name: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.name = Some(non_empty("name", name)?);
        Ok(self)
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn max_people(mut self, max_people: i64) -> Result<Self, InvalidArgument> {
        self.max_people = Some(non_negative("max_people", max_people)?);
        Ok(self)
    }

    /// Dates are kept to the whole second, like on the wire.
    pub fn date_begin(mut self, date_begin: DateTime<Utc>) -> Self {
        self.date_begin = Some(date::to_wire_precision(date_begin));
        self
    }

    pub fn date_end(mut self, date_end: DateTime<Utc>) -> Self {
        self.date_end = Some(date::to_wire_precision(date_end));
        self
    }

    pub fn base_price(mut self, base_price: f64) -> Result<Self, InvalidArgument> {
        self.base_price = Some(Price::new(base_price)?);
        Ok(self)
    }

    pub fn state(mut self, state: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.state = Some(non_empty("state", state)?);
        Ok(self)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    pub fn last_update(mut self, last_update: Option<DateTime<Utc>>) -> Self {
        self.last_update = last_update.map(date::to_wire_precision);
        self
    }

    pub fn build(self, kind: EventKind) -> Result<Event, InvalidArgument> {
        Ok(Event {
            id: required("id", self.id)?,
            name: required("name", self.name)?,
            location: required("location", self.location)?,
            max_people: required("max_people", self.max_people)?,
            date_begin: required("date_begin", self.date_begin)?,
            date_end: required("date_end", self.date_end)?,
            base_price: required("base_price", self.base_price)?,
            state: required("state", self.state)?,
            description: self.description,
            image_path: self.image_path,
            last_update: self.last_update,
            kind,
        })
    }
}

/// Seats, registrations and age band of a speed-dating evening.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpeedDating {
    men_seats: u32,
    women_seats: u32,
    men_registered: u32,
    women_registered: u32,
    min_age: u32,
    max_age: u32,
    establishment: Establishment,
}

impl SpeedDating {
    pub fn men_seats(&self) -> u32 {
        self.men_seats
    }

    pub fn women_seats(&self) -> u32 {
        self.women_seats
    }

    pub fn men_registered(&self) -> u32 {
        self.men_registered
    }

    pub fn women_registered(&self) -> u32 {
        self.women_registered
    }

    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn establishment(&self) -> &Establishment {
        &self.establishment
    }
}

#[derive(Debug, Default)]
pub struct SpeedDatingBuilder {
    men_seats: Option<u32>,
    women_seats: Option<u32>,
    men_registered: u32,
    women_registered: u32,
    min_age: Option<u32>,
    max_age: Option<u32>,
    establishment: Option<Establishment>,
}

impl SpeedDatingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn men_seats(mut self, men_seats: i64) -> Result<Self, InvalidArgument> {
        self.men_seats = Some(non_negative("men_seats", men_seats)?);
        Ok(self)
    }

    pub fn women_seats(mut self, women_seats: i64) -> Result<Self, InvalidArgument> {
        self.women_seats = Some(non_negative("women_seats", women_seats)?);
        Ok(self)
    }

    pub fn men_registered(mut self, men_registered: i64) -> Result<Self, InvalidArgument> {
        self.men_registered = non_negative("men_registered", men_registered)?;
        Ok(self)
    }

    pub fn women_registered(mut self, women_registered: i64) -> Result<Self, InvalidArgument> {
        self.women_registered = non_negative("women_registered", women_registered)?;
        Ok(self)
    }

    /// Fails if a maximum age is already set and is lower than `min_age`.
    pub fn min_age(mut self, min_age: i64) -> Result<Self, InvalidArgument> {
        let min = non_negative("min_age", min_age)?;
        if let Some(max) = self.max_age.filter(|&max| min > max) {
            return Err(InvalidArgument::AgeRange { min, max });
        }
        self.min_age = Some(min);
        Ok(self)
    }

    /// Fails if a minimum age is already set and is higher than `max_age`.
    pub fn max_age(mut self, max_age: i64) -> Result<Self, InvalidArgument> {
        let max = non_negative("max_age", max_age)?;
        if let Some(min) = self.min_age.filter(|&min| min > max) {
            return Err(InvalidArgument::AgeRange { min, max });
        }
        self.max_age = Some(max);
        Ok(self)
    }

    pub fn establishment(mut self, establishment: Establishment) -> Self {
        self.establishment = Some(establishment);
        self
    }

    pub fn build(self) -> Result<SpeedDating, InvalidArgument> {
        Ok(SpeedDating {
            men_seats: required("men_seats", self.men_seats)?,
            women_seats: required("women_seats", self.women_seats)?,
            men_registered: self.men_registered,
            women_registered: self.women_registered,
            min_age: required("min_age", self.min_age)?,
            max_age: required("max_age", self.max_age)?,
            establishment: required("establishment", self.establishment)?,
        })
    }
}
