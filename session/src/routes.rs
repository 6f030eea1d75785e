//! Route table shared by the web client and the cli.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::guard::ProtectedRoute;
use crate::model::SessionState;
use crate::role::Role;

pub const LOGIN_PATH: &str = "/login";
pub const FORGOT_PASSWORD_PATH: &str = "/forgot-password";
pub const ROOT_PATH: &str = "/";

const PUBLIC_PATHS: [&str; 2] = [LOGIN_PATH, FORGOT_PASSWORD_PATH];

const ROLE_SECTIONS: [(&str, Role); 3] = [
    ("/admin", Role::Admin),
    ("/doctor", Role::Doctor),
    ("/receptionist", Role::Receptionist),
];

fn path_only(location: &str) -> &str {
    location.split(['?', '#']).next().unwrap_or(location)
}

fn within(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

/// Protection for `location`, or `None` for public pages.
///
/// Role sections require their role; every other page needs a signed-in user.
#[must_use]
pub fn protection_for(location: &str) -> Option<ProtectedRoute> {
    let path = path_only(location);
    if PUBLIC_PATHS.contains(&path) {
        return None;
    }
    let protection = ROLE_SECTIONS
        .iter()
        .find(|(prefix, _)| within(path, prefix))
        .map_or_else(ProtectedRoute::authenticated, |(_, role)| ProtectedRoute::requiring(*role));
    Some(protection)
}

/// Target of `/`: the role dashboard when signed in, the login page otherwise.
#[must_use]
pub fn home_path(state: &SessionState) -> &'static str {
    state.user().map_or(LOGIN_PATH, |user| user.role.landing_path())
}
