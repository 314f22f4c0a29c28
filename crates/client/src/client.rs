//! Brix API client.
//!
//! Async HTTP client using `reqwest`. Every request sends and expects JSON;
//! failures are logged and returned without retry.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    ApiResponse, BrixStats, ErrorBody, HealthStatus, MessageResponse, NewReading, PlantReference,
    Reading, ReadingPage, ReadingUpdate, ReadingsQuery,
};

/// Characters escaped in a path segment, matching JavaScript's `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors from the Brix API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's `error` field when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl Error {
    /// HTTP status of an API error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Brix API client. Build one per process and share it by reference.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the API rooted at `base_url` (e.g. `http://localhost:3001/api`).
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists readings, optionally filtered by plant and paginated.
    pub async fn list_readings(&self, query: &ReadingsQuery) -> Result<ReadingPage, Error> {
        let req = self
            .request(Method::GET, "/brix/readings")
            .query(&query.params());
        self.execute(req, "/brix/readings").await
    }

    pub async fn get_reading(&self, id: &str) -> Result<Reading, Error> {
        let endpoint = format!("/brix/readings/{}", escape(id));
        let req = self.request(Method::GET, &endpoint);
        self.execute_data(req, &endpoint).await
    }

    pub async fn create_reading(&self, reading: &NewReading) -> Result<Reading, Error> {
        let req = self.request(Method::POST, "/brix/readings").json(reading);
        self.execute_data(req, "/brix/readings").await
    }

    /// Applies a partial update; fields left `None` are not sent.
    pub async fn update_reading(&self, id: &str, update: &ReadingUpdate) -> Result<Reading, Error> {
        let endpoint = format!("/brix/readings/{}", escape(id));
        let req = self.request(Method::PUT, &endpoint).json(update);
        self.execute_data(req, &endpoint).await
    }

    /// Deletes a reading and returns the server's confirmation message.
    pub async fn delete_reading(&self, id: &str) -> Result<String, Error> {
        let endpoint = format!("/brix/readings/{}", escape(id));
        let req = self.request(Method::DELETE, &endpoint);
        let resp: MessageResponse = self.execute(req, &endpoint).await?;
        if !resp.success {
            warn!(endpoint = %endpoint, "server reported unsuccessful delete");
        }
        Ok(resp.message)
    }

    pub async fn list_plants(&self) -> Result<Vec<PlantReference>, Error> {
        let req = self.request(Method::GET, "/brix/plants");
        self.execute_data(req, "/brix/plants").await
    }

    /// Looks up a plant reference by name. The name is percent-escaped.
    pub async fn get_plant(&self, name: &str) -> Result<PlantReference, Error> {
        let endpoint = format!("/brix/plants/{}", escape(name));
        let req = self.request(Method::GET, &endpoint);
        self.execute_data(req, &endpoint).await
    }

    /// Aggregate statistics, optionally for a single plant.
    pub async fn stats(&self, plant_name: Option<&str>) -> Result<BrixStats, Error> {
        let params: Vec<(&str, &str)> = plant_name
            .filter(|n| !n.is_empty())
            .map(|n| vec![("plant_name", n)])
            .unwrap_or_default();
        let req = self.request(Method::GET, "/brix/stats").query(&params);
        self.execute_data(req, "/brix/stats").await
    }

    pub async fn health(&self) -> Result<HealthStatus, Error> {
        let req = self.request(Method::GET, "/health");
        self.execute(req, "/health").await
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
    }

    /// Executes a request whose body is a `{success, data}` envelope.
    async fn execute_data<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, Error> {
        let resp: ApiResponse<T> = self.execute(req, endpoint).await?;
        if !resp.success {
            warn!(endpoint, "server flagged response as unsuccessful");
        }
        Ok(resp.data)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, Error> {
        debug!(endpoint, "API request");
        let result = send(req).await;
        if let Err(e) = &result {
            warn!(endpoint, error = %e, "API request failed");
        }
        result
    }
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, Error> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Builds an API error from a failed response body.
fn api_error(status: u16, body: &[u8]) -> Error {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {status}"));
    Error::Api { status, message }
}

fn escape(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Validates the base URL and strips trailing slashes so endpoints can be appended.
fn normalize_base_url(base_url: &str) -> Result<String, Error> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason,
    };

    let url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".into()));
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}
