//! Root application component with routing and the session provider.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use session::Role;

use crate::components::protected_route::ProtectedRoute;
use crate::pages::dashboard::{AdminDashboardPage, DoctorDashboardPage, ReceptionistDashboardPage};
use crate::pages::home::{ForgotPasswordPage, HomePage};
use crate::pages::login::LoginPage;
use crate::state::auth::provide_session;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Installs the session context before the router so every route, guard and
/// page shares one session.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_session();

    view! {
        <Stylesheet id="leptos" href="/pkg/clinic.css"/>
        <Title text="ClinicSys"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("forgot-password") view=ForgotPasswordPage/>
                <Route path=StaticSegment("") view=HomePage/>
                <Route
                    path=(StaticSegment("admin"), StaticSegment("dashboard"))
                    view=|| view! {
                        <ProtectedRoute roles=vec![Role::Admin]>
                            <AdminDashboardPage/>
                        </ProtectedRoute>
                    }
                />
                <Route
                    path=(StaticSegment("doctor"), StaticSegment("dashboard"))
                    view=|| view! {
                        <ProtectedRoute roles=vec![Role::Doctor]>
                            <DoctorDashboardPage/>
                        </ProtectedRoute>
                    }
                />
                <Route
                    path=(StaticSegment("receptionist"), StaticSegment("dashboard"))
                    view=|| view! {
                        <ProtectedRoute roles=vec![Role::Receptionist]>
                            <ReceptionistDashboardPage/>
                        </ProtectedRoute>
                    }
                />
            </Routes>
        </Router>
    }
}
