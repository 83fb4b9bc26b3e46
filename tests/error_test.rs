use std::time::Duration;

use riftwatch::{ErrorKind, RiftwatchError};

#[test]
fn test_status_mapping() {
    assert!(matches!(
        RiftwatchError::from_status(401, "x", None),
        RiftwatchError::AuthenticationFailed
    ));
    assert!(matches!(
        RiftwatchError::from_status(403, "x", None),
        RiftwatchError::AuthenticationFailed
    ));
    assert!(matches!(
        RiftwatchError::from_status(404, "/lol/match/v5/matches/NA1_1", None),
        RiftwatchError::NotFound(ref r) if r == "/lol/match/v5/matches/NA1_1"
    ));
    assert!(matches!(
        RiftwatchError::from_status(503, "x", None),
        RiftwatchError::Upstream { status: Some(503), .. }
    ));
    assert!(matches!(
        RiftwatchError::from_status(400, "x", None),
        RiftwatchError::Api { status: 400, .. }
    ));
}

#[test]
fn test_retry_after_only_for_429() {
    let hint = Some(Duration::from_secs(7));
    let limited = RiftwatchError::from_status(429, "x", hint);
    assert_eq!(limited.retry_after(), hint);
    assert!(limited.is_transient());

    assert_eq!(RiftwatchError::from_status(503, "x", hint).retry_after(), None);
}

#[test]
fn test_transience() {
    assert!(RiftwatchError::from_status(500, "x", None).is_transient());
    assert!(!RiftwatchError::NotFound("x".into()).is_transient());
    assert!(!RiftwatchError::AuthenticationFailed.is_transient());
    assert!(
        !RiftwatchError::Unavailable {
            attempts: 3,
            last_error: "boom".into()
        }
        .is_transient()
    );
}

#[test]
fn test_kinds() {
    let cases = [
        (RiftwatchError::NotFound("x".into()), ErrorKind::NotFound),
        (
            RiftwatchError::Unavailable {
                attempts: 3,
                last_error: "x".into(),
            },
            ErrorKind::Unavailable,
        ),
        (RiftwatchError::AuthenticationFailed, ErrorKind::Rejected),
        (RiftwatchError::InvalidInput("x".into()), ErrorKind::Rejected),
        (
            RiftwatchError::InsufficientData {
                required: 10,
                available: 3,
            },
            ErrorKind::Rejected,
        ),
        (RiftwatchError::Configuration("x".into()), ErrorKind::Internal),
        (RiftwatchError::Render("x".into()), ErrorKind::Internal),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "{err}");
    }
}

#[test]
fn test_display() {
    let err = RiftwatchError::InsufficientData {
        required: 10,
        available: 3,
    };
    assert_eq!(err.to_string(), "not enough matches to analyze: 3 of 10 required");

    let err = RiftwatchError::Unavailable {
        attempts: 3,
        last_error: "timed out".into(),
    };
    assert_eq!(
        err.to_string(),
        "upstream unavailable after 3 attempt(s): timed out"
    );
}

#[test]
fn test_json_error_conversion() {
    let err: RiftwatchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, RiftwatchError::Json(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}
