//! Route guard decisions.
//!
//! A guard is re-evaluated on every navigation and every session change. It
//! never mutates the session; it only says what the view layer should do.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::model::SessionState;
use crate::role::Role;
use crate::routes::LOGIN_PATH;

/// Query parameter carrying the location a redirected user asked for.
pub const FROM_PARAM: &str = "from";

/// Roles allowed to render a protected view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any signed-in user.
    #[default]
    Any,
    /// Signed in with at least one of these roles.
    OneOf(Vec<Role>),
}

impl RoleRequirement {
    #[must_use]
    pub fn is_satisfied_by(&self, state: &SessionState) -> bool {
        match self {
            Self::Any => state.is_authenticated(),
            Self::OneOf(roles) => roles.iter().any(|role| state.has_role(*role)),
        }
    }
}

/// Protection attached to a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub required: RoleRequirement,
    pub redirect_target: String,
}

impl Default for ProtectedRoute {
    fn default() -> Self {
        Self { required: RoleRequirement::Any, redirect_target: LOGIN_PATH.to_owned() }
    }
}

/// Outcome of evaluating a [`ProtectedRoute`] against the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore has not finished; show a neutral placeholder.
    Loading,
    /// Not signed in; navigate to `to`, remembering `from`.
    Redirect { to: String, from: String },
    /// Signed in without a required role; show permission denied in place.
    Forbidden,
    Render,
}

impl GuardDecision {
    /// Full URL for a redirect decision, with the return location encoded.
    #[must_use]
    pub fn redirect_url(&self) -> Option<String> {
        match self {
            Self::Redirect { to, from } => Some(login_redirect(to, from)),
            _ => None,
        }
    }
}

impl ProtectedRoute {
    /// Route open to any signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requiring(role: Role) -> Self {
        Self::requiring_any([role])
    }

    #[must_use]
    pub fn requiring_any(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: RoleRequirement::OneOf(roles.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_target = target.into();
        self
    }

    /// Decide what to do with a navigation to `location`.
    #[must_use]
    pub fn evaluate(&self, state: &SessionState, location: &str) -> GuardDecision {
        if state.loading {
            return GuardDecision::Loading;
        }
        if !state.is_authenticated() {
            return GuardDecision::Redirect {
                to: self.redirect_target.clone(),
                from: location.to_owned(),
            };
        }
        if self.required.is_satisfied_by(state) {
            GuardDecision::Render
        } else {
            GuardDecision::Forbidden
        }
    }
}

/// `target` with `from` appended as an encoded query parameter.
#[must_use]
pub fn login_redirect(target: &str, from: &str) -> String {
    if from.is_empty() || from == target {
        return target.to_owned();
    }
    format!("{target}?{FROM_PARAM}={}", urlencoding::encode(from))
}

/// Accept a return location only if it stays on this site.
///
/// `value` is already percent-decoded. Absolute URLs, protocol-relative
/// paths and the login page itself are refused.
#[must_use]
pub fn return_location(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    let local = value.starts_with('/') && !value.starts_with("//") && !value.contains('\\');
    let is_login = value == LOGIN_PATH || value.starts_with(&format!("{LOGIN_PATH}?"));
    (local && !is_login).then(|| value.to_owned())
}

/// Where a fresh login should land: the remembered location if it is safe,
/// otherwise the role's dashboard.
#[must_use]
pub fn post_login_destination(from: Option<&str>, role: Role) -> String {
    return_location(from).unwrap_or_else(|| role.landing_path().to_owned())
}
