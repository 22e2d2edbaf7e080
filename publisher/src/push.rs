use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::config::{PublisherConfig, PushEndpoints};
use crate::errors::PushError;

pub(crate) const EMPTY_JSON_OBJECT: &str = "{}";

/// Client for the push service. Cheap to share; holds no per-request state.
#[derive(Debug, Clone)]
pub struct PushClient {
    pub(crate) client: Client,
    pub(crate) endpoints: PushEndpoints,
    pub(crate) site_url: Url,
    pub(crate) push_delay: Duration,
}

impl PushClient {
    pub fn new(client: Client, config: &PublisherConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoints: PushEndpoints::new(config)?,
            site_url: config.site_url.clone(),
            push_delay: config.push_delay,
        })
    }
}

/// Adds the JSON content headers and the bearer token.
pub(crate) fn with_auth_headers(request: RequestBuilder, access_token: &str) -> RequestBuilder {
    request
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", access_token))
}

/// Sends the request and checks the response against the one accepted status.
pub(crate) async fn send_expecting(
    request: RequestBuilder,
    url: &Url,
    expected: StatusCode,
) -> Result<Response, PushError> {
    let response = request.send().await.map_err(|source| PushError::Transport {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        return Err(PushError::UnexpectedStatus {
            url: url.to_string(),
            status,
            body,
        });
    }

    Ok(response)
}
