//! Immutable domain entities and the builders that stage them.
//!
//! # Design
//! Entities keep their fields private and expose getters, so a built value
//! cannot be changed; an update is a freshly parsed value that replaces the
//! old one. Builders are consumed by their setters and by `build()`.
//! Setters that can reject their argument return `Result<Self, _>` and fail
//! at the offending field rather than at `build()`, which only checks that
//! required fields were provided.
//!
//! Numeric setters take `i64`, the width JSON integers are read at, and
//! narrow to the stored unsigned type after the range check.
//!
//! Every entity derives `Serialize` into its wire shape, which is what the
//! parsers in [`crate::parser`] read back.

pub mod address;
pub mod establishment;
pub mod event;
pub mod location;
pub mod user;

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::InvalidArgument;

pub use address::{Address, AddressBuilder, DEFAULT_ADDRESS};
pub use establishment::{Establishment, EstablishmentBuilder, EstablishmentType};
pub use event::{Event, EventBuilder, EventKind, SpeedDating, SpeedDatingBuilder};
pub use location::{Location, LocationBuilder};
pub use user::{Gender, NewUser, User, UserBuilder};

/// Event base price. Finite and non-negative, so it can take part in `Eq`
/// and `Hash`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, InvalidArgument> {
        if !value.is_finite() || value < 0.0 {
            return Err(InvalidArgument::Invalid {
                field: "base_price",
                reason: format!("{value} is not a finite non-negative amount"),
            });
        }
        // -0.0 + 0.0 == +0.0, keeping to_bits() consistent with ==.
        Ok(Self(value + 0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for Price {}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

pub(crate) fn non_negative<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, InvalidArgument> {
    if value < 0 {
        return Err(InvalidArgument::Negative { field, value });
    }
    narrow(field, value)
}

pub(crate) fn positive<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, InvalidArgument> {
    if value <= 0 {
        return Err(InvalidArgument::NotPositive { field, value });
    }
    narrow(field, value)
}

fn narrow<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, InvalidArgument> {
    T::try_from(value).map_err(|_| InvalidArgument::Invalid {
        field,
        reason: format!("{value} is out of range"),
    })
}

pub(crate) fn non_empty(field: &'static str, value: impl Into<String>) -> Result<String, InvalidArgument> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(InvalidArgument::Empty(field));
    }
    Ok(value)
}

pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T, InvalidArgument> {
    value.ok_or(InvalidArgument::Missing(field))
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn price_rejects_negative_and_non_finite() {
        assert!(Price::new(-1.0).is_err());
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
        assert_eq!(Price::new(25.5).unwrap().value(), 25.5);
    }

    #[test]
    fn negative_zero_price_hashes_like_zero() {
        let negative = Price::new(-0.0).unwrap();
        let zero = Price::new(0.0).unwrap();
        assert_eq!(negative, zero);
        assert_eq!(hash_of(&negative), hash_of(&zero));
    }

    #[test]
    fn range_helpers() {
        assert_eq!(non_negative::<u32>("id", 0), Ok(0));
        assert_eq!(
            non_negative::<u32>("id", -4),
            Err(InvalidArgument::Negative { field: "id", value: -4 })
        );
        assert_eq!(
            positive::<u32>("max_seats", 0),
            Err(InvalidArgument::NotPositive { field: "max_seats", value: 0 })
        );
        assert_eq!(non_empty("name", "  "), Err(InvalidArgument::Empty("name")));
        assert_eq!(required::<u8>("gender", None), Err(InvalidArgument::Missing("gender")));
    }
}
