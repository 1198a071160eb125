use serde::Serialize;

use super::{non_empty, non_negative, required};
use crate::error::InvalidArgument;

/// Fallback used when an establishment carries no address.
pub const DEFAULT_ADDRESS: Address = Address {
    street: String::new(),
    number: 0,
    zip_code: 0,
    city: String::new(),
    province: String::new(),
    country: String::new(),
};

/// A postal address, embedded by value in an establishment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    street: String,
    number: u32,
    zip_code: u32,
    city: String,
    province: String,
    country: String,
}

impl Address {
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_ADDRESS
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn zip_code(&self) -> u32 {
        self.zip_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

#[derive(Debug, Default)]
pub struct AddressBuilder {
    street: Option<String>,
    number: u32,
    zip_code: u32,
    city: Option<String>,
    province: String,
    country: String,
}

impl AddressBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn street(mut self, street: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.street = Some(non_empty("street", street)?);
        Ok(self)
    }

    pub fn number(mut self, number: i64) -> Result<Self, InvalidArgument> {
        self.number = non_negative("number", number)?;
        Ok(self)
    }

    pub fn zip_code(mut self, zip_code: i64) -> Result<Self, InvalidArgument> {
        self.zip_code = non_negative("zip_code", zip_code)?;
        Ok(self)
    }

    pub fn city(mut self, city: impl Into<String>) -> Result<Self, InvalidArgument> {
        self.city = Some(non_empty("city", city)?);
        Ok(self)
    }

    pub fn province(mut self, province: impl Into<String>) -> Self {
        self.province = province.into();
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn build(self) -> Result<Address, InvalidArgument> {
        Ok(Address {
            street: required("street", self.street)?,
            number: self.number,
            zip_code: self.zip_code,
            city: required("city", self.city)?,
            province: self.province,
            country: self.country,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_full_address() {
        let address = AddressBuilder::new()
            .street("Rue de Bourg")
            .and_then(|b| b.number(12))
            .and_then(|b| b.zip_code(1003))
            .and_then(|b| b.city("Lausanne"))
            .unwrap()
            .province("VD")
            .country("CH")
            .build()
            .unwrap();
        assert_eq!(address.street(), "Rue de Bourg");
        assert_eq!(address.zip_code(), 1003);
        assert_eq!(address.country(), "CH");
    }

    #[test]
    fn negative_number_fails_at_the_setter() {
        let err = AddressBuilder::new().number(-3).unwrap_err();
        assert_eq!(err, InvalidArgument::Negative { field: "number", value: -3 });
    }

    #[test]
    fn city_is_required() {
        let err = AddressBuilder::new().street("Rue du Lac").unwrap().build().unwrap_err();
        assert_eq!(err, InvalidArgument::Missing("city"));
    }

    #[test]
    fn default_address_is_empty() {
        assert_eq!(DEFAULT_ADDRESS.street(), "");
        assert_eq!(DEFAULT_ADDRESS.number(), 0);
    }
}
