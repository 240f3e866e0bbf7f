use super::*;

#[test]
fn from_error_body_uses_server_message() {
    let err = RequestError::from_error_body(403, r#"{"error":"Доступ запрещен"}"#.as_bytes());
    assert_eq!(err.to_string(), "Доступ запрещен");
    assert_eq!(err.status(), Some(403));
}

#[test]
fn from_error_body_falls_back_when_field_missing() {
    let err = RequestError::from_error_body(500, br#"{"detail":"boom"}"#);
    assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
}

#[test]
fn from_error_body_falls_back_on_non_json() {
    let err = RequestError::from_error_body(502, b"<html>Bad Gateway</html>");
    assert_eq!(
        err,
        RequestError::Status { status: 502, message: GENERIC_FAILURE_MESSAGE.to_owned() }
    );
}

#[test]
fn from_error_body_ignores_empty_message() {
    let err = RequestError::from_error_body(400, br#"{"error":""}"#);
    assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
}

#[test]
fn transport_and_body_errors_have_no_status() {
    assert_eq!(RequestError::Transport("offline".to_owned()).status(), None);
    assert_eq!(RequestError::Body("eof".to_owned()).status(), None);
}

#[test]
fn serde_errors_convert_to_body_variant() {
    let err: RequestError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, RequestError::Body(_)));
}
