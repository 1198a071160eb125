use std::sync::Arc;

use super::{require_non_empty, require_non_negative, Endpoint};
use crate::error::ClientError;
use crate::http::Transport;
use crate::json::{parse_objects, SafeJson};
use crate::model::Event;
use crate::parser::parse_event;

/// Read access to the event catalogue.
pub trait EventClient: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<Event>, ClientError>;

    fn fetch_by_id(&self, id: i64) -> Result<Event, ClientError>;

    /// Events `username` is registered to.
    fn fetch_registered(&self, username: &str) -> Result<Vec<Event>, ClientError>;
}

#[derive(Clone)]
pub struct NetworkEventClient {
    endpoint: Endpoint,
}

impl NetworkEventClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, transport)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    fn fetch_list(&self, segments: &[&str]) -> Result<Vec<Event>, ClientError> {
        let body = self.endpoint.fetch(segments)?;
        let events = parse_objects(&body)?
            .iter()
            .map(parse_event)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = events.len(), "fetched events");
        Ok(events)
    }
}

impl EventClient for NetworkEventClient {
    fn fetch_all(&self) -> Result<Vec<Event>, ClientError> {
        self.fetch_list(&["api", "events"])
    }

    fn fetch_by_id(&self, id: i64) -> Result<Event, ClientError> {
        require_non_negative("id", id)?;
        let body = self.endpoint.fetch(&["api", "events", &id.to_string()])?;
        Ok(parse_event(&body.parse::<SafeJson>()?)?)
    }

    fn fetch_registered(&self, username: &str) -> Result<Vec<Event>, ClientError> {
        require_non_empty("username", username)?;
        self.fetch_list(&["api", "users", username, "events"])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::stub::StubTransport;
    use crate::error::{ParseError, TransportError};
    use crate::http::HttpMethod;

    const BASE: &str = "http://localhost:3000";

    const EVENT: &str = r#"{
        "type": "speed_dating", "id": 1, "name": "Speed dating Lausanne",
        "location": {"id": 1, "name": "Lausanne"},
        "max_people": 20,
        "date_begin": "2015-12-24T19:00:00+0100",
        "date_end": "2015-12-24T23:00:00+0100",
        "base_price": 25.5, "state": "pending",
        "men_seats": 10, "women_seats": 10, "min_age": 20, "max_age": 30,
        "establishment": {"id": 1, "name": "Le Bourg", "type": "bar",
                          "phone_number": "021 311 11 11", "max_seats": 40}
    }"#;

    fn client(responses: Vec<Result<String, TransportError>>) -> (NetworkEventClient, Arc<StubTransport>) {
        let transport = Arc::new(StubTransport::replying(responses));
        let client = NetworkEventClient::new(BASE, transport.clone()).unwrap();
        (client, transport)
    }

    #[test]
    fn fetch_all_parses_every_event() {
        let (client, transport) = client(vec![Ok(format!("[{EVENT}]"))]);
        let events = client.fetch_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "Speed dating Lausanne");
        assert_eq!(events[0].as_speed_dating().unwrap().max_age(), 30);
        assert_eq!(
            transport.requests(),
            vec![(HttpMethod::Get, format!("{BASE}/api/events"), None)]
        );
    }

    #[test]
    fn empty_catalogue_is_empty() {
        let (client, _) = client(vec![Ok("[]".to_string())]);
        assert!(client.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn fetch_by_id_uses_the_event_route() {
        let (client, transport) = client(vec![Ok(EVENT.to_string())]);
        let event = client.fetch_by_id(1).unwrap();
        assert_eq!(event.id(), 1);
        assert_eq!(transport.requests()[0].1, format!("{BASE}/api/events/1"));
    }

    #[test]
    fn negative_id_fails_before_io() {
        let (client, transport) = client(vec![]);
        assert!(matches!(client.fetch_by_id(-1), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(client.fetch_registered(""), Err(ClientError::InvalidArgument(_))));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn registered_events_of_a_user() {
        let (client, transport) = client(vec![Ok(format!("[{EVENT}]"))]);
        let events = client.fetch_registered("Admin").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(transport.requests()[0].1, format!("{BASE}/api/users/Admin/events"));
    }

    #[test]
    fn unknown_event_type_is_a_parse_error() {
        let body = EVENT.replace("speed_dating", "quiz_night");
        let (client, _) = client(vec![Ok(format!("[{body}]"))]);
        assert!(matches!(
            client.fetch_all(),
            Err(ClientError::Parse(ParseError::UnknownType(t))) if t == "quiz_night"
        ));
    }

    #[test]
    fn object_where_a_list_is_expected_is_a_parse_error() {
        let (client, _) = client(vec![Ok(EVENT.to_string())]);
        assert!(matches!(client.fetch_all(), Err(ClientError::Parse(_))));
    }
}
