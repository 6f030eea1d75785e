use super::*;
use session::routes::LOGIN_PATH;
use session::{RoleRequirement, SessionState};

#[test]
fn no_roles_admits_any_signed_in_user() {
    let guard = protection(Vec::new(), None);
    assert_eq!(guard.required, RoleRequirement::Any);
    assert_eq!(guard.redirect_target, LOGIN_PATH);
}

#[test]
fn roles_become_one_of_requirement() {
    let guard = protection(vec![Role::Doctor, Role::Receptionist], None);
    assert_eq!(
        guard.required,
        RoleRequirement::OneOf(vec![Role::Doctor, Role::Receptionist])
    );
}

#[test]
fn custom_redirect_target_is_kept() {
    let guard = protection(vec![Role::Admin], Some("/signin".to_owned()));
    assert_eq!(guard.redirect_target, "/signin");
    let decision = guard.evaluate(&SessionState::signed_out(), "/admin/dashboard");
    assert_eq!(
        decision.redirect_url().as_deref(),
        Some("/signin?from=%2Fadmin%2Fdashboard")
    );
}
