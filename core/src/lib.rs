//! Data-access core for the speed-dating service.
//!
//! # Overview
//! Fetches users and events from the REST API, parses the JSON into
//! immutable entities, and submits sign-up forms and event registrations.
//! Server-side validation failures come back as one readable message.
//!
//! # Design
//! - `SafeJson` wraps a JSON object with typed, defaulting reads; parsers
//!   use it to turn bodies into entities through consuming builders.
//! - Events are a closed set of kinds chosen by the `type` tag.
//! - Clients are stateless and do their I/O through an injected
//!   `Transport`, so tests swap the network for canned bodies.
//! - `AppContext` owns config, clients and the signed-in user; there is no
//!   global state.
//! - Entities are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod context;
pub mod date;
pub mod error;
pub mod http;
pub mod json;
pub mod model;
pub mod parser;

pub use client::{EventClient, NetworkEventClient, NetworkUserClient, UserClient};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ClientError, InvalidArgument, ParseError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};
pub use json::SafeJson;
pub use model::{Event, EventKind, NewUser, SpeedDating, User};
