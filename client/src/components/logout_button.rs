//! Sign-out control shown in dashboard headers.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::routes::LOGIN_PATH;

use crate::state::auth::use_session;

/// Asks for confirmation, clears the session and returns to the login page.
#[component]
pub fn LogoutButton() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let on_click = move |_| {
        if !confirm_sign_out() {
            return;
        }
        session.logout();
        navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <button class="logout-button" type="button" on:click=on_click>
            "Sign out"
        </button>
    }
}

#[cfg(feature = "hydrate")]
fn confirm_sign_out() -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message("Sign out of ClinicSys?").ok())
        .unwrap_or(false)
}

#[cfg(not(feature = "hydrate"))]
fn confirm_sign_out() -> bool {
    true
}
