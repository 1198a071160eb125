//! Error taxonomy for the data-access layer.
//!
//! # Design
//! Each layer owns one error type and wraps the layer below it:
//! `InvalidArgument` (builders and client preconditions) is wrapped by
//! `ParseError` when a parser feeds a builder a bad value, and both
//! `ParseError` and `TransportError` are wrapped by `ClientError`, the only
//! error a client caller ever sees. Causes stay reachable through
//! `std::error::Error::source`.

use thiserror::Error;

/// A caller handed a builder setter or a client operation a value outside
/// its domain. Always raised before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("minimum age {min} exceeds maximum age {max}")]
    AgeRange { min: u32, max: u32 },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// JSON did not have the shape of the entity being parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is not {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown {field} `{value}`")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid date `{value}`: {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{source} in {fragment}")]
    Invalid {
        #[source]
        source: InvalidArgument,
        fragment: String,
    },
}

/// The transport could not deliver a 2xx response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, timeout or body read failure.
    #[error("transport failure: {0}")]
    Io(String),

    /// The server answered with a non-2xx status. The body is kept because
    /// validation failures travel in it.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors returned by the typed clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The server returned 404 for the requested resource.
    #[error("resource not found")]
    NotFound,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected response: {0}")]
    Parse(#[from] ParseError),

    /// Aggregated server-side field validation messages, verbatim.
    #[error("{0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn validation_message_is_displayed_verbatim() {
        let err = ClientError::Validation("Validation Failed: Choose a valid gender ".to_string());
        assert_eq!(err.to_string(), "Validation Failed: Choose a valid gender ");
    }

    #[test]
    fn invalid_parse_error_keeps_its_cause() {
        let err = ParseError::Invalid {
            source: InvalidArgument::Negative { field: "id", value: -1 },
            fragment: r#"{"id":-1}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"id must not be negative (got -1) in {"id":-1}"#);
        let cause = err.source().expect("cause");
        assert_eq!(cause.to_string(), "id must not be negative (got -1)");
    }

    #[test]
    fn client_error_wraps_parse_error_as_source() {
        let err = ClientError::from(ParseError::UnknownType("quiz".to_string()));
        assert_eq!(err.to_string(), "unexpected response: unknown type: quiz");
        assert!(err.source().is_some());
    }
}
