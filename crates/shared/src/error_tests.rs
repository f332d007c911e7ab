use super::*;
use rstest::rstest;

#[rstest]
#[case(ErrorKind::Validation, 400, "VALIDATION_ERROR")]
#[case(ErrorKind::NotFound, 404, "NOT_FOUND")]
#[case(ErrorKind::Conflict, 409, "CONFLICT")]
#[case(ErrorKind::Referential, 422, "REFERENTIAL_ERROR")]
#[case(ErrorKind::Unexpected, 500, "UNEXPECTED_ERROR")]
fn test_error_kind_codes(#[case] kind: ErrorKind, #[case] status: u16, #[case] code: &str) {
    assert_eq!(kind.status_code(), status);
    assert_eq!(kind.error_code(), code);
    assert_eq!(kind.to_string(), code);
}

#[test]
fn test_app_error_kind_round_trip() {
    for kind in [
        ErrorKind::Validation,
        ErrorKind::Conflict,
        ErrorKind::NotFound,
        ErrorKind::Referential,
        ErrorKind::Unexpected,
    ] {
        let err = AppError::new(kind, "msg");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), kind.status_code());
        assert_eq!(err.error_code(), kind.error_code());
    }
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Validation("msg".into())),
        "Validation error: msg"
    );
    assert_eq!(format!("{}", AppError::Conflict("msg".into())), "Conflict: msg");
    assert_eq!(format!("{}", AppError::NotFound("msg".into())), "Not found: msg");
    assert_eq!(
        format!("{}", AppError::Referential("msg".into())),
        "Referential error: msg"
    );
    assert_eq!(format!("{}", AppError::Unexpected), "Something went wrong");
}

#[test]
fn test_unexpected_drops_message() {
    let err = AppError::new(ErrorKind::Unexpected, "connection reset by peer");
    assert!(!err.to_string().contains("connection reset"));
}
