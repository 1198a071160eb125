//! Byte-level transport behind the typed clients.
//!
//! # Design
//! Clients never touch the network directly. They hand a URL (and, for
//! `create`, a JSON body) to a [`Transport`] and get back the raw response
//! body. The trait knows nothing about entities or parsing, so tests can
//! substitute a transport that returns canned bodies.
//!
//! [`HttpTransport`] is the real implementation. Each call is described as
//! a plain [`HttpRequest`] value and then executed with a blocking `ureq`
//! agent. Status codes are not treated as transport errors by the agent;
//! [`HttpTransport`] turns any non-2xx status into
//! `TransportError::Status` and keeps the body, since validation failures
//! are reported in it.

use std::time::Duration;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Blocking request capability injected into every client.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, TransportError>;

    fn create(&self, url: &str, body: &Value) -> Result<String, TransportError>;

    fn delete(&self, url: &str) -> Result<String, TransportError>;
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn post_json(url: &str, body: &Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body.to_string()),
        }
    }

    pub fn delete(url: &str) -> Self {
        Self {
            method: HttpMethod::Delete,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// The body of a 2xx response, or the status and body as an error.
    pub fn into_body(self) -> Result<String, TransportError> {
        if (200..300).contains(&self.status) {
            return Ok(self.body);
        }
        tracing::warn!(status = self.status, "server answered with an error status");
        Err(TransportError::Status {
            status: self.status,
            body: self.body,
        })
    }
}

/// [`Transport`] over blocking HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Execute `request` and return the response as data, whatever its
    /// status.
    pub fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = ?request.method, url = %request.url, "sending request");
        request
            .headers
            .push(("user-agent".to_string(), self.user_agent.clone()));
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut call = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            HttpMethod::Delete => {
                let mut call = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            HttpMethod::Post => {
                let mut call = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => call.send(body.as_bytes()),
                    None => call.send_empty(),
                }
            }
        }
        .map_err(|err| TransportError::Io(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| TransportError::Io(err.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        self.execute(HttpRequest::get(url))?.into_body()
    }

    fn create(&self, url: &str, body: &Value) -> Result<String, TransportError> {
        self.execute(HttpRequest::post_json(url, body))?.into_body()
    }

    fn delete(&self, url: &str) -> Result<String, TransportError> {
        self.execute(HttpRequest::delete(url))?.into_body()
    }
}
