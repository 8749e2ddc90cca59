use crate::{config::ParseConfig, error::ParseError};
use async_trait::async_trait;
use http::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use parse_analytics::{Analytics, EventData, RequestExecutor};
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const APPLICATION_ID_HEADER: &str = "X-Parse-Application-Id";
pub const REST_API_KEY_HEADER: &str = "X-Parse-REST-API-Key";
pub const MASTER_KEY_HEADER: &str = "X-Parse-Master-Key";
pub const SESSION_TOKEN_HEADER: &str = "X-Parse-Session-Token";

/// [`RequestExecutor`] backed by the Parse REST API.
#[derive(Debug, Clone)]
pub struct ParseClient {
    server_url: Url,
    client: Client,
}

impl ParseClient {
    pub fn new(config: &ParseConfig) -> Result<Self, ParseError> {
        let server_url = Url::parse(&config.server_url).map_err(|err| {
            ParseError::configuration(&format!(
                "Invalid server url {}: {err}",
                config.server_url
            ))
        })?;

        if server_url.cannot_be_a_base() {
            return Err(ParseError::configuration(&format!(
                "Server url {} cannot carry a path",
                config.server_url
            )));
        }

        if config.request_timeout_secs == 0 {
            return Err(ParseError::configuration(
                "PARSE_REQUEST_TIMEOUT_SECS must be greater than zero",
            ));
        }

        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| {
                ParseError::configuration(&format!("Failed to create client: {err}"))
            })?;

        Ok(Self { server_url, client })
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_str()
    }

    /// Appends a relative path to the server url. Each `/`-separated segment
    /// is percent-encoded on its own, so `#`, `?` and `%` stay inside the
    /// path while `/` keeps splitting segments.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut endpoint = self.server_url.clone();
        let path = path.strip_prefix('/').unwrap_or(path);

        // cannot-be-a-base urls are rejected in `new`
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }

        endpoint
    }

    pub fn analytics(&self) -> Analytics<ParseClient> {
        Analytics::new(self.clone())
    }

    async fn handle_response(response: Response) -> Result<Value, ParseError> {
        let status = response.status();
        let content = response.text().await.map_err(|err| {
            error!("Failed to read response: {err}");
            ParseError::Transport(err)
        })?;

        if !status.is_success() {
            return Err(ParseError::from_response(status, content));
        }

        if content.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl RequestExecutor for ParseClient {
    type Response = Value;
    type Error = ParseError;

    #[tracing::instrument(skip(self, body))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: EventData,
    ) -> Result<Value, ParseError> {
        let endpoint = self.endpoint(path);
        let bodiless = body.is_empty() && (method == Method::GET || method == Method::DELETE);

        let mut request_builder = self.client.request(method, endpoint.clone());
        if !bodiless {
            request_builder = request_builder.json(&body);
        }

        let response = request_builder.send().await.map_err(|err| {
            error!("Failed to send request to {endpoint}: {err}");
            ParseError::Transport(err)
        })?;

        debug!("{endpoint} responded with {}", response.status());

        Self::handle_response(response).await
    }
}

fn default_headers(config: &ParseConfig) -> Result<HeaderMap, ParseError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        HeaderName::from_static("x-parse-application-id"),
        header_value(&config.application_id, APPLICATION_ID_HEADER)?,
    );
    headers.insert(
        HeaderName::from_static("x-parse-rest-api-key"),
        secret_header_value(&config.rest_api_key, REST_API_KEY_HEADER)?,
    );

    if let Some(master_key) = &config.master_key {
        headers.insert(
            HeaderName::from_static("x-parse-master-key"),
            secret_header_value(master_key, MASTER_KEY_HEADER)?,
        );
    }

    if let Some(session_token) = &config.session_token {
        headers.insert(
            HeaderName::from_static("x-parse-session-token"),
            secret_header_value(session_token, SESSION_TOKEN_HEADER)?,
        );
    }

    Ok(headers)
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue, ParseError> {
    HeaderValue::from_str(value)
        .map_err(|err| ParseError::configuration(&format!("Invalid {name} header: {err}")))
}

fn secret_header_value(value: &SecretString, name: &str) -> Result<HeaderValue, ParseError> {
    let mut value = header_value(value.expose_secret(), name)?;
    value.set_sensitive(true);
    Ok(value)
}
