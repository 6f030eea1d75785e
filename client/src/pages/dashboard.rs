//! Per-role dashboard pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each dashboard sits behind a role-restricted `ProtectedRoute`. On mount it
//! fetches its summary endpoint through the authenticated API client, so a
//! 401 signs the user out globally while a 403 only shows a local error.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use serde_json::Value;
use session::Role;

use crate::components::logout_button::LogoutButton;
use crate::state::auth::use_session;

/// Page heading for a role's dashboard.
pub fn dashboard_title(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administration",
        Role::Doctor => "Doctor Workspace",
        Role::Receptionist => "Front Desk",
    }
}

/// `totalPatients` / `total_patients` -> `Total patients`.
pub fn humanize_key(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            words.push(' ');
            prev_lower = false;
        } else if ch.is_uppercase() && prev_lower {
            words.push(' ');
            words.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            words.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_owned(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.len().to_string(),
        Value::Object(fields) => format!("{} fields", fields.len()),
        other => other.to_string(),
    }
}

/// Label/value rows for a summary payload. Non-object payloads yield nothing.
pub fn stats_rows(payload: &Value) -> Vec<(String, String)> {
    let Some(fields) = payload.as_object() else {
        return Vec::new();
    };
    fields.iter().map(|(key, value)| (humanize_key(key), display_value(value))).collect()
}

#[derive(Clone, Debug, PartialEq)]
enum Summary {
    Loading,
    Ready(Vec<(String, String)>),
    Failed(String),
}

#[component]
pub fn DashboardPage(role: Role) -> impl IntoView {
    let session = use_session();
    let state = session.state_signal();
    let summary = RwSignal::new(Summary::Loading);

    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        leptos::task::spawn_local(async move {
            let endpoint = crate::net::api::dashboard_endpoint(role);
            match session.api().get_json::<Value>(endpoint).await {
                Ok(payload) => summary.set(Summary::Ready(stats_rows(&payload))),
                Err(e) => summary.set(Summary::Failed(crate::util::auth::api_error_message(&e))),
            }
        });
    }

    let username = move || state.get().user().map(|u| u.username.clone()).unwrap_or_default();

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>{dashboard_title(role)}</h1>
                <span class="dashboard-header__user">{username} " (" {role.as_str()} ")"</span>
                <LogoutButton/>
            </header>
            <section class="dashboard-summary">
                {move || match summary.get() {
                    Summary::Loading => view! { <p class="dashboard-summary__loading">"Loading summary..."</p> }.into_any(),
                    Summary::Failed(msg) => view! { <p class="dashboard-summary__error">{msg}</p> }.into_any(),
                    Summary::Ready(rows) if rows.is_empty() => {
                        view! { <p class="dashboard-summary__empty">"Nothing to show yet."</p> }.into_any()
                    }
                    Summary::Ready(rows) => view! {
                        <dl class="dashboard-summary__stats">
                            {rows
                                .into_iter()
                                .map(|(label, value)| view! {
                                    <div class="dashboard-stat">
                                        <dt>{label}</dt>
                                        <dd>{value}</dd>
                                    </div>
                                })
                                .collect_view()}
                        </dl>
                    }
                    .into_any(),
                }}
            </section>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! { <DashboardPage role=Role::Admin/> }
}

#[component]
pub fn DoctorDashboardPage() -> impl IntoView {
    view! { <DashboardPage role=Role::Doctor/> }
}

#[component]
pub fn ReceptionistDashboardPage() -> impl IntoView {
    view! { <DashboardPage role=Role::Receptionist/> }
}
