//! Root and placeholder public pages.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::routes::{LOGIN_PATH, home_path};

use crate::state::auth::use_session;

/// `/`: forwards to the role dashboard, or to the login page when signed out.
#[component]
pub fn HomePage() -> impl IntoView {
    let state = use_session().state_signal();
    let navigate = use_navigate();

    Effect::new(move || {
        let current = state.get();
        if current.loading {
            return;
        }
        navigate(home_path(&current), NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    view! { <p class="route-loading">"Loading..."</p> }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Reset password"</h1>
                <p class="login-card__subtitle">
                    "Password resets are handled by your clinic administrator."
                </p>
                <a class="login-link" href=LOGIN_PATH>"Back to sign in"</a>
            </div>
        </div>
    }
}
