//! Zendesk HTTP client implementation.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{multipart, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// Fire-and-forget callback invoked once for every failing call.
///
/// Purely diagnostic: it never alters the error returned to the caller.
pub type ErrorObserver = Arc<dyn Fn(&Error) + Send + Sync>;

/// Zendesk API client.
///
/// Holds the account credentials and a shared HTTP connection pool. The
/// client is immutable after construction and cheap to clone; a single
/// instance can be shared across concurrent tasks.
#[derive(Clone)]
pub struct ZendeskClient {
    http: Client,
    email: String,
    token: String,
    host: String,
    error_observer: Option<ErrorObserver>,
}

impl ZendeskClient {
    /// Create a new Zendesk client with default options.
    ///
    /// # Arguments
    ///
    /// * `email` - Account email used for token auth
    /// * `token` - Zendesk API token
    /// * `host` - Base host (e.g., `"https://example.zendesk.com"`)
    #[must_use]
    pub fn new(email: impl Into<String>, token: impl Into<String>, host: impl Into<String>) -> Self {
        Self::with_options(email, token, host, ClientOptions::default())
    }

    /// Create a new Zendesk client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        email: impl Into<String>,
        token: impl Into<String>,
        host: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().expect("failed to build HTTP client");

        Self {
            http,
            email: email.into(),
            token: token.into(),
            host: host.into().trim_end_matches('/').to_string(),
            error_observer: options.error_observer,
        }
    }

    /// Send a request to the given path under `/api/v2/`.
    ///
    /// `path` is relative to the API root and may carry its own query string
    /// (e.g., `"tickets.json?async=true"`). An `Accept: application/json`
    /// header is set on every request; `Content-Type: application/json` only
    /// for POST and PUT.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the body cannot be
    /// read, or the response status is outside the 2xx/3xx range. The
    /// [`Error::Status`] variant carries the status and raw body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, Error> {
        let url = self.api_url(path);
        tracing::debug!(%method, %url, "sending request");

        let is_json_body = method == Method::POST || method == Method::PUT;
        let mut request = self.http.request(method, url);
        if is_json_body {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        self.send_request(request).await
    }

    /// Upload a local file as a `multipart/form-data` request.
    ///
    /// The file's full contents become a single form part named
    /// `param_name`, with the path's base name as the part filename.
    /// Authentication and status classification follow the same path as
    /// [`send`](Self::send).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the same
    /// errors as [`send`](Self::send).
    pub async fn send_file(
        &self,
        method: Method,
        path: &str,
        param_name: &str,
        file_path: &Path,
    ) -> Result<ApiResponse, Error> {
        let url = self.api_url(path);
        tracing::debug!(%method, %url, file = %file_path.display(), "sending file");

        let contents = tokio::fs::read(file_path)
            .await
            .map_err(|e| self.observe(Error::Io(e)))?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let part = multipart::Part::bytes(contents).file_name(file_name);
        let form = multipart::Form::new().part(param_name.to_string(), part);
        let request = self.http.request(method, url).multipart(form);

        self.send_request(request).await
    }

    /// Shared request path: token auth, transport, status classification.
    ///
    /// Every API call in the library funnels through here, so auth, error
    /// observation, and the 2xx/3xx success boundary behave identically for
    /// JSON and multipart requests.
    async fn send_request(&self, request: RequestBuilder) -> Result<ApiResponse, Error> {
        let request = request
            .basic_auth(format!("{}/token", self.email), Some(&self.token))
            .header(ACCEPT, "application/json");

        let response = request
            .send()
            .await
            .map_err(|e| self.observe(Error::Http(e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.observe(Error::Http(e)))?
            .to_vec();

        if !is_success(status) {
            return Err(self.observe(Error::Status { status, body }));
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.host, path)
    }

    /// Route an error through the observer (if configured) and hand it back.
    pub(crate) fn observe(&self, err: Error) -> Error {
        if let Some(observer) = &self.error_observer {
            observer(&err);
        }
        err
    }

    pub(crate) fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(value).map_err(|e| self.observe(Error::Serialization(e)))
    }

    pub(crate) fn unmarshal<T: DeserializeOwned>(
        &self,
        response: &ApiResponse,
    ) -> Result<T, Error> {
        serde_json::from_slice(&response.body).map_err(|e| self.observe(Error::Serialization(e)))
    }
}

impl fmt::Debug for ZendeskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("ZendeskClient")
            .field("email", &self.email)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// A fully read API response.
///
/// Returned by the raw [`ZendeskClient::send`]/[`ZendeskClient::send_file`]
/// entry points and by operations that do not parse a response body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (always in the 2xx/3xx range).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Client options for customization.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Request timeout. `None` leaves the transport default (no timeout),
    /// matching Zendesk's documented client behavior.
    pub timeout: Option<Duration>,
    /// Callback invoked once for every failing call.
    pub error_observer: Option<ErrorObserver>,
}

impl ClientOptions {
    /// Set a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set an error observer.
    #[must_use]
    pub fn with_error_observer(mut self, observer: ErrorObserver) -> Self {
        self.error_observer = Some(observer);
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("timeout", &self.timeout)
            .field("error_observer", &self.error_observer.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Success iff the status class is 2xx or 3xx.
fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16() / 100, 2 | 3)
}
