//! Route wrapper that enforces sign-in and role requirements.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps each protected page in `App`. The decision is a memo over the
//! session signal and the current location, so it is re-evaluated on every
//! navigation and on every login, logout or 401-driven sign-out.

#[cfg(test)]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use session::routes::home_path;
use session::{GuardDecision, ProtectedRoute as Protection, Role};

use crate::state::auth::use_session;
use crate::util::auth::requested_location;

/// Build the guard for a route. An empty role list admits any signed-in user.
pub fn protection(roles: Vec<Role>, redirect_to: Option<String>) -> Protection {
    let base = if roles.is_empty() {
        Protection::authenticated()
    } else {
        Protection::requiring_any(roles)
    };
    match redirect_to {
        Some(target) => base.redirect_to(target),
        None => base,
    }
}

/// Renders `children` only when the session satisfies the route.
///
/// Signed-out visitors are sent to the login page (replacing the history
/// entry) with the requested location in `?from=`. A signed-in user without
/// a required role sees a permission-denied view in place; the session is
/// left alone.
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] roles: Vec<Role>,
    #[prop(optional, into)] redirect_to: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let navigate = use_navigate();

    let guard = protection(roles, redirect_to);
    let state = session.state_signal();
    let decision = Memo::new(move |_| {
        let here = requested_location(&location.pathname.get(), &location.search.get());
        guard.evaluate(&state.get(), &here)
    });

    Effect::new(move || {
        if let Some(url) = decision.get().redirect_url() {
            navigate(&url, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decision.get() {
        GuardDecision::Loading => view! { <LoadingPlaceholder/> }.into_any(),
        GuardDecision::Forbidden => view! { <PermissionDenied/> }.into_any(),
        GuardDecision::Redirect { .. } => ().into_any(),
        GuardDecision::Render => children().into_any(),
    }
}

#[component]
fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="route-loading" aria-busy="true">
            <p>"Loading..."</p>
        </div>
    }
}

#[component]
fn PermissionDenied() -> impl IntoView {
    let session = use_session();
    let state = session.state_signal();
    let role = move || state.get().user().map(|u| u.role.to_string()).unwrap_or_default();
    let home = move || home_path(&state.get());

    view! {
        <div class="permission-denied">
            <h1>"403"</h1>
            <p>"You do not have permission to view this page."</p>
            <p class="permission-denied__role">"Signed in as " {role}</p>
            <a class="permission-denied__home" href=home>"Back to your dashboard"</a>
        </div>
    }
}
