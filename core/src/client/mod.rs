//! Typed clients over a [`Transport`].
//!
//! # Design
//! A client checks its arguments, sends the request through the injected
//! transport, and parses the raw body into entities. Every failure on the
//! way back becomes a [`ClientError`]:
//!
//! - a body shaped like a server validation failure, whatever the status,
//!   becomes `ClientError::Validation` with the messages flattened in the
//!   caller's field order;
//! - a 404 becomes `ClientError::NotFound`;
//! - any other transport failure is `ClientError::Transport`;
//! - a body that does not parse is `ClientError::Parse`.
//!
//! Clients hold no mutable state and may be shared between threads.

pub mod event;
pub mod user;

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::validate_base_url;
use crate::error::{ClientError, InvalidArgument, TransportError};
use crate::http::Transport;
use crate::json::SafeJson;

pub use event::{EventClient, NetworkEventClient};
pub use user::{NetworkUserClient, UserClient};

const DEFAULT_VALIDATION_MESSAGE: &str = "Validation Failed";

/// Base URL plus transport, shared by the network clients.
#[derive(Clone)]
pub(crate) struct Endpoint {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl Endpoint {
    pub(crate) fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let base_url = validate_base_url(base_url)?;
        let base_url = Url::parse(&base_url).map_err(|err| InvalidArgument::Invalid {
            field: "base_url",
            reason: err.to_string(),
        })?;
        Ok(Self { base_url, transport })
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<String, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| InvalidArgument::Invalid {
                field: "base_url",
                reason: "cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    pub(crate) fn fetch(&self, segments: &[&str]) -> Result<String, ClientError> {
        let url = self.url(segments)?;
        let body = self.transport.fetch(&url).map_err(|err| translate(err, &[]))?;
        reject_validation_body(&body, &[])?;
        Ok(body)
    }

    pub(crate) fn create(&self, segments: &[&str], body: &Value, fields: &[&str]) -> Result<String, ClientError> {
        let url = self.url(segments)?;
        let body = self.transport.create(&url, body).map_err(|err| translate(err, fields))?;
        reject_validation_body(&body, fields)?;
        Ok(body)
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> Result<String, ClientError> {
        let url = self.url(segments)?;
        let body = self.transport.delete(&url).map_err(|err| translate(err, &[]))?;
        reject_validation_body(&body, &[])?;
        Ok(body)
    }
}

fn translate(err: TransportError, fields: &[&str]) -> ClientError {
    if let TransportError::Status { status, body } = &err {
        if let Some(message) = validation_message(body, fields) {
            tracing::warn!(status, %message, "server rejected the request");
            return ClientError::Validation(message);
        }
        if *status == 404 {
            return ClientError::NotFound;
        }
    }
    ClientError::Transport(err)
}

fn reject_validation_body(body: &str, fields: &[&str]) -> Result<(), ClientError> {
    match validation_message(body, fields) {
        Some(message) => {
            tracing::warn!(%message, "server returned validation errors");
            Err(ClientError::Validation(message))
        }
        None => Ok(()),
    }
}

/// Flatten a `{"message": …, "errors": {"children": {field: {"errors":
/// [...]}}}}` body into `"<message>: "` followed by every field message and
/// a single space, fields taken in `fields` order. With no declared fields,
/// the body's own field order is used. `None` if `body` is not shaped that
/// way.
pub fn validation_message(body: &str, fields: &[&str]) -> Option<String> {
    let json: SafeJson = body.parse().ok()?;
    let children = json
        .get_opt::<SafeJson>("errors")?
        .get_opt::<SafeJson>("children")?;

    let declared: Vec<String> = if fields.is_empty() {
        match Value::from(children.clone()) {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    } else {
        fields.iter().map(|field| field.to_string()).collect()
    };

    let mut message = json.get("message", DEFAULT_VALIDATION_MESSAGE.to_string());
    message.push_str(": ");
    for field in &declared {
        let errors = children
            .get(field, SafeJson::default())
            .get("errors", Vec::<Value>::new());
        for error in errors.iter().filter_map(Value::as_str) {
            message.push_str(error);
            message.push(' ');
        }
    }
    Some(message)
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(InvalidArgument::Empty(field).into());
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: i64) -> Result<(), ClientError> {
    if value < 0 {
        return Err(InvalidArgument::Negative { field, value }.into());
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod stub {
    //! Canned-response transport recording what it was asked.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::Value;

    use crate::error::TransportError;
    use crate::http::{HttpMethod, Transport};

    #[derive(Default)]
    pub(crate) struct StubTransport {
        responses: Mutex<VecDeque<Result<String, TransportError>>>,
        pub(crate) requests: Mutex<Vec<(HttpMethod, String, Option<Value>)>>,
    }

    impl StubTransport {
        pub(crate) fn replying(responses: impl IntoIterator<Item = Result<String, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::default(),
            }
        }

        pub(crate) fn requests(&self) -> Vec<(HttpMethod, String, Option<Value>)> {
            self.requests.lock().unwrap().clone()
        }

        fn answer(&self, method: HttpMethod, url: &str, body: Option<&Value>) -> Result<String, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((method, url.to_string(), body.cloned()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no canned response left")
        }
    }

    impl Transport for StubTransport {
        fn fetch(&self, url: &str) -> Result<String, TransportError> {
            self.answer(HttpMethod::Get, url, None)
        }

        fn create(&self, url: &str, body: &Value) -> Result<String, TransportError> {
            self.answer(HttpMethod::Post, url, Some(body))
        }

        fn delete(&self, url: &str) -> Result<String, TransportError> {
            self.answer(HttpMethod::Delete, url, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;

    const GENDER_AND_DATE: &str = r#"{"code":400,"message":"Validation Failed","errors":{"children":{
        "email":{},"username":{},"firstName":{},"lastName":{},
        "gender":{"errors":["Choose a valid gender"]},
        "birthDate":{"errors":["This value is not valid."]},
        "facebookId":{},"plainPassword":{}}}}"#;

    #[test]
    fn flattens_in_declared_field_order() {
        let message = validation_message(GENDER_AND_DATE, &NewUser::FIELDS).unwrap();
        assert_eq!(message, "Validation Failed: Choose a valid gender This value is not valid. ");
    }

    #[test]
    fn declared_order_wins_over_body_order() {
        let body = r#"{"message":"Validation Failed","errors":{"children":{
            "username":{"errors":["The username is already used"]},
            "email":{"errors":["The email is already used"]}}}}"#;
        let message = validation_message(body, &NewUser::FIELDS).unwrap();
        assert_eq!(message, "Validation Failed: The email is already used The username is already used ");
    }

    #[test]
    fn without_declared_fields_the_body_order_is_kept() {
        let body = r#"{"errors":{"children":{"zeta":{"errors":["first"]},"alpha":{"errors":["second"]}}}}"#;
        let message = validation_message(body, &[]).unwrap();
        assert_eq!(message, "Validation Failed: first second ");
    }

    #[test]
    fn every_message_of_a_field_is_kept() {
        let body = r#"{"errors":{"children":{"username":{"errors":["Too short.","Already used."]}}}}"#;
        let message = validation_message(body, &["username"]).unwrap();
        assert_eq!(message, "Validation Failed: Too short. Already used. ");
    }

    #[test]
    fn other_bodies_are_not_validation_failures() {
        assert!(validation_message("", &[]).is_none());
        assert!(validation_message(r#"{"id":1}"#, &[]).is_none());
        assert!(validation_message(r#"{"errors":["x"]}"#, &[]).is_none());
    }

    #[test]
    fn not_found_status_translates() {
        let err = translate(
            TransportError::Status {
                status: 404,
                body: "Not Found".to_string(),
            },
            &[],
        );
        assert!(matches!(err, ClientError::NotFound));
    }

    #[test]
    fn io_failure_translates_to_transport() {
        let err = translate(TransportError::Io("connection refused".to_string()), &[]);
        assert!(matches!(err, ClientError::Transport(TransportError::Io(_))));
    }

    #[test]
    fn urls_are_percent_encoded() {
        let endpoint = Endpoint::new(
            "http://localhost:3000/",
            std::sync::Arc::new(stub::StubTransport::default()),
        )
        .unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:3000");
        assert_eq!(
            endpoint.url(&["api", "users", "Jean Dupont"]).unwrap(),
            "http://localhost:3000/api/users/Jean%20Dupont"
        );
    }
}
