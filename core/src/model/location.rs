use serde::Serialize;

use super::{non_empty, non_negative, required};
use crate::error::InvalidArgument;

/// A region events take place in, and that users declare interest in.
/// Ordered by id, then name, so sets of locations are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    id: u32,
    name: String,
}

impl Location {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
pub struct LocationBuilder {
    id: Option<u32>,
    name: Option<String>,
}

impl LocationBuilder {
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

    pub fn build(self) -> Result<Location, InvalidArgument> {
        Ok(Location {
            id: required("id", self.id)?,
            name: required("name", self.name)?,
        })
    }
}
