use std::sync::Arc;

use serde_json::{json, Value};

use super::{require_non_empty, require_non_negative, Endpoint};
use crate::error::{ClientError, InvalidArgument};
use crate::http::Transport;
use crate::json::SafeJson;
use crate::model::{NewUser, User};
use crate::parser::{Parser, UserParser};

const REGISTRATION_FIELDS: [&str; 2] = ["username", "event"];

/// User accounts and event registrations.
pub trait UserClient: Send + Sync {
    fn fetch_by_username(&self, username: &str) -> Result<User, ClientError>;

    fn fetch_by_facebook_id(&self, facebook_id: &str) -> Result<User, ClientError>;

    /// Submit the sign-up form and return the server's echo of the new user.
    fn create(&self, user: &NewUser) -> Result<SafeJson, ClientError> {
        let form = serde_json::to_value(user).map_err(|err| InvalidArgument::Invalid {
            field: "user",
            reason: err.to_string(),
        })?;
        self.create_json(&form)
    }

    /// Like [`UserClient::create`] with a form object built by the caller.
    fn create_json(&self, user: &Value) -> Result<SafeJson, ClientError>;

    fn delete(&self, username: &str) -> Result<(), ClientError>;

    fn register(&self, username: &str, event_id: i64) -> Result<(), ClientError>;

    fn unregister(&self, registration_id: i64) -> Result<(), ClientError>;
}

/// [`UserClient`] talking to the REST API through a [`Transport`].
#[derive(Clone)]
pub struct NetworkUserClient {
    endpoint: Endpoint,
}

impl NetworkUserClient {
    /// Fails with `ClientError::InvalidArgument` on a blank or unparsable
    /// base URL.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, transport)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    fn fetch_user(&self, segments: &[&str]) -> Result<User, ClientError> {
        let body = self.endpoint.fetch(segments)?;
        let user = UserParser.parse(&body.parse::<SafeJson>()?)?;
        tracing::debug!(username = user.username(), "fetched user");
        Ok(user)
    }
}

impl UserClient for NetworkUserClient {
    fn fetch_by_username(&self, username: &str) -> Result<User, ClientError> {
        require_non_empty("username", username)?;
        self.fetch_user(&["api", "users", username])
    }

    fn fetch_by_facebook_id(&self, facebook_id: &str) -> Result<User, ClientError> {
        require_non_empty("facebook_id", facebook_id)?;
        self.fetch_user(&["api", "facebook", "users", facebook_id])
    }

    fn create_json(&self, user: &Value) -> Result<SafeJson, ClientError> {
        match user {
            Value::Null => return Err(InvalidArgument::Missing("user").into()),
            Value::Object(_) => {}
            _ => {
                return Err(InvalidArgument::Invalid {
                    field: "user",
                    reason: "expected a JSON object".to_string(),
                }
                .into())
            }
        }
        let body = self.endpoint.create(&["api", "users"], user, &NewUser::FIELDS)?;
        Ok(body.parse::<SafeJson>()?)
    }

    fn delete(&self, username: &str) -> Result<(), ClientError> {
        require_non_empty("username", username)?;
        self.endpoint.delete(&["api", "users", username])?;
        tracing::debug!(username, "deleted user");
        Ok(())
    }

    fn register(&self, username: &str, event_id: i64) -> Result<(), ClientError> {
        require_non_empty("username", username)?;
        require_non_negative("event_id", event_id)?;
        let body = json!({ "username": username, "event": event_id });
        self.endpoint
            .create(&["api", "registrations"], &body, &REGISTRATION_FIELDS)?;
        tracing::debug!(username, event_id, "registered to event");
        Ok(())
    }

    fn unregister(&self, registration_id: i64) -> Result<(), ClientError> {
        require_non_negative("registration_id", registration_id)?;
        self.endpoint
            .delete(&["api", "registrations", &registration_id.to_string()])?;
        Ok(())
    }
}
