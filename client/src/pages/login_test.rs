use super::*;
use session::{StoreError, UnknownRole};

#[test]
fn validate_login_input_trims_username_only() {
    assert_eq!(
        validate_login_input("  dr.house  ", " secret "),
        Ok(("dr.house".to_owned(), " secret ".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), Err("Enter both username and password."));
    assert_eq!(validate_login_input("admin", ""), Err("Enter both username and password."));
}

#[test]
fn invalid_credentials_message_is_generic() {
    let msg = login_error_message(&AuthError::InvalidCredentials);
    assert_eq!(msg, "Invalid username or password.");
}

#[test]
fn rejected_message_carries_status() {
    let msg = login_error_message(&AuthError::Rejected { status: 503, message: "maintenance".to_owned() });
    assert_eq!(msg, "Login failed (503): maintenance");
}

#[test]
fn malformed_grants_share_one_message() {
    let unknown = login_error_message(&AuthError::UnknownRole(UnknownRole("NURSE".to_owned())));
    assert_eq!(unknown, login_error_message(&AuthError::MissingToken));
}

#[test]
fn storage_failure_mentions_browser() {
    let msg = login_error_message(&AuthError::Storage(StoreError::Unavailable("quota".to_owned())));
    assert!(msg.contains("browser"));
}
