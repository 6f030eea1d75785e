//! Login page: username and password against the ClinicSys backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route. A successful login lands on the location remembered in
//! `?from=` by the route guard, or on the role's dashboard. A visitor who is
//! already signed in is forwarded the same way.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use session::AuthError;
use session::guard::{FROM_PARAM, post_login_destination};
use session::routes::FORGOT_PASSWORD_PATH;

use crate::state::auth::use_session;

/// Trim the username and require both fields.
///
/// The password is passed through untouched; leading or trailing spaces may
/// be part of it.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// User-facing text for a failed login.
pub fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials => "Invalid username or password.".to_owned(),
        AuthError::Network(_) => "Cannot reach the server. Check your connection and try again.".to_owned(),
        AuthError::Rejected { status, message } => format!("Login failed ({status}): {message}"),
        AuthError::Decode(_) | AuthError::MissingToken | AuthError::UnknownRole(_) => {
            "The server sent an unexpected login response.".to_owned()
        }
        AuthError::Storage(_) => "Could not save your session in this browser.".to_owned(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let query = use_query_map();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let from = move || query.get().get(FROM_PARAM);

    // Signed in, either just now or before a reload of /login.
    let state = session.state_signal();
    Effect::new(move || {
        let current = state.get();
        if let Some(user) = current.user() {
            let target = post_login_destination(from().as_deref(), user.role);
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (username_value, password_value) = match validate_login_input(&username.get(), &password.get()) {
            Ok(input) => input,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        // Success publishes the session; the effect above does the redirect.
        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                match session.login(&username_value, &password_value).await {
                    Ok(_) => {
                        info.set(String::new());
                        password.set(String::new());
                    }
                    Err(e) => info.set(login_error_message(&e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (username_value, password_value);
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"ClinicSys"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href=FORGOT_PASSWORD_PATH>"Forgot password?"</a>
            </div>
        </div>
    }
}
