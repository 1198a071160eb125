use serde::Serialize;

use super::{non_empty, non_negative, positive, required, Address};
use crate::error::InvalidArgument;

/// Kind of venue hosting an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstablishmentType {
    Bar,
    Restaurant,
    Hotel,
}

impl EstablishmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
        }
    }

    /// Case-insensitive lookup of a server tag; `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::Bar, Self::Restaurant, Self::Hotel]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
    }
}

/// A venue an event takes place in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Establishment {
    id: u32,
    name: String,
    #[serde(rename = "type")]
    kind: EstablishmentType,
    #[serde(skip_serializing_if = "Address::is_default")]
    address: Address,
    phone_number: String,
    description: Option<String>,
    url: Option<String>,
    max_seats: u32,
    logo_path: Option<String>,
}

impl Establishment {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EstablishmentType {
        self.kind
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn max_seats(&self) -> u32 {
        self.max_seats
    }

    pub fn logo_path(&self) -> Option<&str> {
        self.logo_path.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct EstablishmentBuilder {
    id: Option<u32>,
    name: Option<String>,
    kind: Option<EstablishmentType>,
    address: Option<Address>,
    phone_number: Option<String>,
    description: Option<String>,
    url: Option<String>,
    max_seats: Option<u32>,
    logo_path: Option<String>,
}

impl EstablishmentBuilder {
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

    /// Accepts the result of [`EstablishmentType::from_tag`] directly; an
    /// unknown tag is rejected here.
    pub fn kind(mut self, kind: Option<EstablishmentType>) -> Result<Self, InvalidArgument> {
        self.kind = Some(required("type", kind)?);
        Ok(self)
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.phone_number = Some(non_empty("phone_number", phone_number)?);
        Ok(self)
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn max_seats(mut self, max_seats: i64) -> Result<Self, InvalidArgument> {
        self.max_seats = Some(positive("max_seats", max_seats)?);
        Ok(self)
    }

    pub fn logo_path(mut self, logo_path: Option<String>) -> Self {
        self.logo_path = logo_path;
        self
    }

    pub fn build(self) -> Result<Establishment, InvalidArgument> {
        Ok(Establishment {
            id: required("id", self.id)?,
            name: required("name", self.name)?,
            kind: required("type", self.kind)?,
            address: required("address", self.address)?,
            phone_number: required("phone_number", self.phone_number)?,
            description: self.description,
            url: self.url,
            max_seats: required("max_seats", self.max_seats)?,
            logo_path: self.logo_path,
        })
    }
}
