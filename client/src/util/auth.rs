//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route guard, login page and dashboards should describe locations and
//! failures the same way.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use session::ApiError;

/// Path plus query string, as remembered for the post-login return.
pub fn requested_location(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{search}")
    }
}

/// User-facing text for an authenticated request failure.
pub fn api_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_owned(),
        ApiError::Forbidden { .. } => "You do not have permission to view this information.".to_owned(),
        ApiError::Network(_) => "Cannot reach the server. Check your connection and try again.".to_owned(),
        ApiError::Status { status, message } => format!("Request failed ({status}): {message}"),
        ApiError::Decode(_) => "The server sent an unexpected response.".to_owned(),
    }
}
