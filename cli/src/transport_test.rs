use super::*;

#[test]
fn endpoint_url_joins_with_single_slash() {
    assert_eq!(endpoint_url("http://h/api/", "/auth/login"), "http://h/api/auth/login");
    assert_eq!(endpoint_url("http://h/api", "doctor/dashboard"), "http://h/api/doctor/dashboard");
}

#[test]
fn methods_map_one_to_one() {
    assert_eq!(to_reqwest(Method::Get), reqwest::Method::GET);
    assert_eq!(to_reqwest(Method::Patch), reqwest::Method::PATCH);
    assert_eq!(to_reqwest(Method::Delete), reqwest::Method::DELETE);
}

#[test]
fn terminal_navigator_is_never_on_login_page() {
    assert_eq!(TerminalNavigator.current_path(), "");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let transport = ReqwestTransport::new("http://127.0.0.1:9");
    let err = transport.send(ApiRequest::get("/healthz")).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
}
