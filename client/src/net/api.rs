//! REST transport and endpoint helpers for the ClinicSys backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): the transport reports a network error, since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! The transport never interprets status codes. 401/403 classification and
//! session invalidation belong to `session::RequestAuthenticator`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use session::{ApiRequest, ApiResponse, Role, Transport, TransportError};

/// Backend base address, fixed at build time.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

pub const ADMIN_DASHBOARD_STATS: &str = "/admin/dashboard/stats";
pub const DOCTOR_DASHBOARD: &str = "/doctor/dashboard";
pub const RECEPTIONIST_DASHBOARD: &str = "/receptionist/dashboard";

#[must_use]
pub fn api_base_url() -> &'static str {
    option_env!("CLINIC_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)
}

/// Join `base` and an API-relative `path` with exactly one slash.
#[cfg(any(test, feature = "hydrate"))]
fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Summary endpoint backing each role's dashboard.
#[must_use]
pub fn dashboard_endpoint(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_DASHBOARD_STATS,
        Role::Doctor => DOCTOR_DASHBOARD,
        Role::Receptionist => RECEPTIONIST_DASHBOARD,
    }
}

/// `gloo-net` transport rooted at the backend base address.
#[derive(Clone, Copy, Debug)]
pub struct BrowserTransport {
    base_url: &'static str,
}

impl Default for BrowserTransport {
    fn default() -> Self {
        Self { base_url: api_base_url() }
    }
}

impl BrowserTransport {
    #[must_use]
    pub fn new(base_url: &'static str) -> Self {
        Self { base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &'static str {
        self.base_url
    }
}

impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;
            use session::Method;

            let url = endpoint_url(self.base_url, &request.path);
            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Patch => Request::patch(&url),
                Method::Delete => Request::delete(&url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

            let resp = prepared
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
            Ok(ApiResponse::new(status, body))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(TransportError::Network("not available on server".to_owned()))
        }
    }
}
