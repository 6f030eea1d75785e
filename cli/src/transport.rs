//! `reqwest` implementation of the session transport and the terminal
//! stand-in for browser navigation.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use session::{ApiRequest, ApiResponse, Method, Navigator, Transport, TransportError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Join `base` and an API-relative `path` with exactly one slash.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = endpoint_url(&self.base_url, &request.path);
        let mut builder = self.client.request(to_reqwest(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Network(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
        tracing::debug!(method = request.method.as_str(), %url, status, "api reply");
        Ok(ApiResponse::new(status, body))
    }
}

/// A terminal has no location; a forced sign-out is reported instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        String::new()
    }

    fn redirect(&self, path: &str) {
        tracing::warn!(target_path = path, "session expired; run `clinic login` to sign in again");
    }
}
