//! Authenticated request wrapper around a pluggable HTTP transport.
//!
//! Every outbound call reads the token from the session store at send time
//! and carries it as `Authorization: Bearer <token>`. Replies are classified:
//!
//! - 401: the backend no longer accepts the token. The session that sent the
//!   request is cleared and the user is sent to the login view.
//! - 403: the user is signed in but not allowed to see this resource. The
//!   session is kept and the caller gets [`ApiError::Forbidden`].
//!
//! ERROR HANDLING
//! ==============
//! There is no retry, queueing or token refresh. Every failure reaches the
//! caller as an [`ApiError`]; only 401 additionally mutates session state.

#![allow(async_fn_in_trait)]

#[cfg(test)]
#[path = "authenticator_test.rs"]
mod authenticator_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{SessionCell, SessionHandle};
use crate::routes::LOGIN_PATH;
use crate::store::KeyValueStore;

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Outbound call, relative to the backend base address.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), headers: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            return serde_json::from_value(Value::Null);
        }
        serde_json::from_str(&self.body)
    }
}

/// Failure below HTTP: the request never produced a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Sends one request and returns whatever status the backend answered with.
pub trait Transport {
    /// # Errors
    ///
    /// Returns a [`TransportError`] only when no HTTP reply was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Where the user currently is, and how to move them to the login view.
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("session expired or invalid")]
    Unauthorized,
    #[error("access denied: {message}")]
    Forbidden { message: String },
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Network(#[from] TransportError),
    #[error("response could not be decoded: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error ended the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Best human-readable message from an error reply.
pub(crate) fn error_message(response: &ApiResponse) -> String {
    let from_json = serde_json::from_str::<Value>(&response.body).ok().and_then(|body| {
        ["message", "error"]
            .into_iter()
            .find_map(|field| body.get(field).and_then(Value::as_str).map(str::to_owned))
    });
    let raw = response.body.trim();
    from_json.unwrap_or_else(|| {
        if raw.is_empty() {
            format!("HTTP {}", response.status)
        } else {
            raw.to_owned()
        }
    })
}

/// Injects the stored bearer token into every call and enforces the
/// 401/403 policy.
#[derive(Clone, Debug)]
pub struct RequestAuthenticator<T, S, C, N> {
    transport: T,
    handle: SessionHandle<S, C>,
    navigator: N,
    login_path: String,
}

impl<T, S, C, N> RequestAuthenticator<T, S, C, N>
where
    T: Transport,
    S: KeyValueStore,
    C: SessionCell,
    N: Navigator,
{
    pub fn new(transport: T, handle: SessionHandle<S, C>, navigator: N) -> Self {
        Self { transport, handle, navigator, login_path: LOGIN_PATH.to_owned() }
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn handle(&self) -> &SessionHandle<S, C> {
        &self.handle
    }

    /// Send `request`, attaching the current token if one is stored.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] on 401, after the session was cleared.
    /// - [`ApiError::Forbidden`] on 403; the session is untouched.
    /// - [`ApiError::Status`] on any other non-2xx reply.
    /// - [`ApiError::Network`] when no reply was received.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let sent_token = self.handle.stored_token();
        if let Some(token) = &sent_token {
            request.headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
        }
        let method = request.method;
        let path = request.path.clone();

        let response = self.transport.send(request).await?;
        match response.status {
            401 => {
                log::warn!("{} {path} returned 401", method.as_str());
                self.on_unauthorized(sent_token.as_deref());
                Err(ApiError::Unauthorized)
            }
            403 => {
                log::warn!("{} {path} returned 403; session kept", method.as_str());
                Err(ApiError::Forbidden { message: error_message(&response) })
            }
            status if !response.is_success() => Err(ApiError::Status {
                status,
                message: error_message(&response),
            }),
            _ => Ok(response),
        }
    }

    /// # Errors
    ///
    /// See [`RequestAuthenticator::send`]; also [`ApiError::Decode`].
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        decode(&self.send(ApiRequest::get(path)).await?)
    }

    /// # Errors
    ///
    /// See [`RequestAuthenticator::send`]; also [`ApiError::Decode`].
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        decode(&self.send(ApiRequest::post(path, encode(body)?)).await?)
    }

    /// # Errors
    ///
    /// See [`RequestAuthenticator::send`]; also [`ApiError::Decode`].
    pub async fn put_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        decode(&self.send(ApiRequest::put(path, encode(body)?)).await?)
    }

    /// # Errors
    ///
    /// See [`RequestAuthenticator::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Clear the session that issued the rejected request.
    ///
    /// The store is re-read rather than trusting what was sent: if a newer
    /// login replaced the token while the request was in flight, that
    /// session stays.
    fn on_unauthorized(&self, sent_token: Option<&str>) {
        let current = self.handle.stored_token();
        if current.is_some() && current.as_deref() != sent_token {
            log::info!("ignoring 401 for a superseded session");
            return;
        }
        self.handle.invalidate();
        if self.navigator.current_path() != self.login_path {
            self.navigator.redirect(&self.login_path);
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> Result<R, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}
