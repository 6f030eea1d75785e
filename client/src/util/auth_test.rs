use super::*;
use session::TransportError;

#[test]
fn requested_location_without_query() {
    assert_eq!(requested_location("/doctor/dashboard", ""), "/doctor/dashboard");
    assert_eq!(requested_location("/doctor/dashboard", "?"), "/doctor/dashboard");
}

#[test]
fn requested_location_keeps_query_with_or_without_leading_mark() {
    assert_eq!(requested_location("/admin/staff", "page=2"), "/admin/staff?page=2");
    assert_eq!(requested_location("/admin/staff", "?page=2"), "/admin/staff?page=2");
}

#[test]
fn forbidden_message_does_not_mention_sign_in() {
    let msg = api_error_message(&ApiError::Forbidden { message: "Doctors only".to_owned() });
    assert!(msg.contains("permission"));
    assert!(!msg.contains("sign in"));
}

#[test]
fn status_message_includes_code_and_backend_text() {
    let msg = api_error_message(&ApiError::Status { status: 500, message: "db down".to_owned() });
    assert_eq!(msg, "Request failed (500): db down");
}

#[test]
fn network_and_unauthorized_messages() {
    assert!(api_error_message(&ApiError::Network(TransportError::Network("x".to_owned()))).contains("server"));
    assert!(api_error_message(&ApiError::Unauthorized).contains("sign in"));
}
