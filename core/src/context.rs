//! Application-wide state: configuration, clients and the signed-in user.

use std::sync::Arc;

use crate::client::{EventClient, NetworkEventClient, NetworkUserClient, UserClient};
use crate::config::ClientConfig;
use crate::error::{ClientError, InvalidArgument};
use crate::http::{HttpTransport, Transport};
use crate::model::{Event, User};

/// Owns everything a front end needs to talk to the server. Create one per
/// application and pass it around; nothing here is global.
pub struct AppContext {
    config: ClientConfig,
    users: Arc<dyn UserClient>,
    events: Arc<dyn EventClient>,
    session: Option<User>,
}

impl AppContext {
    /// Network clients over one shared [`HttpTransport`].
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config));
        let users = NetworkUserClient::new(&config.base_url, transport.clone())?;
        let events = NetworkEventClient::new(&config.base_url, transport)?;
        tracing::debug!(base_url = users.base_url(), "application context ready");
        Ok(Self::with_clients(config, Arc::new(users), Arc::new(events)))
    }

    pub fn with_clients(config: ClientConfig, users: Arc<dyn UserClient>, events: Arc<dyn EventClient>) -> Self {
        Self {
            config,
            users,
            events,
            session: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn users(&self) -> &dyn UserClient {
        self.users.as_ref()
    }

    pub fn events(&self) -> &dyn EventClient {
        self.events.as_ref()
    }

    /// Look the account up by Facebook id and make it the current user. A
    /// failed lookup leaves the previous session untouched.
    pub fn sign_in_with_facebook(&mut self, facebook_id: &str) -> Result<&User, ClientError> {
        let user = self.users.fetch_by_facebook_id(facebook_id)?;
        tracing::debug!(username = user.username(), "signed in");
        Ok(self.session.insert(user))
    }

    /// Forget the current user, returning it.
    pub fn sign_out(&mut self) -> Option<User> {
        self.session.take()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    /// Events the current user is registered to.
    pub fn my_events(&self) -> Result<Vec<Event>, ClientError> {
        let user = self
            .current_user()
            .ok_or(InvalidArgument::Missing("signed-in user"))?;
        self.events.fetch_registered(user.username())
    }
}
