use std::error::Error;
use seniorcare_core::errors::{CareError, CareResult};

#[test]
fn test_care_error_display() {
    let validation = CareError::Validation("Message cannot be empty".to_string());
    let conflict = CareError::Conflict("Request already sent".to_string());
    let not_found = CareError::NotFound("No user named @maria".to_string());
    let authentication = CareError::Authentication("Session expired".to_string());
    let backend = CareError::Backend("503 Service Unavailable".to_string());
    let storage = CareError::Storage(eyre::eyre!("disk full"));
    let internal = CareError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(validation.to_string(), "Validation error: Message cannot be empty");
    assert_eq!(conflict.to_string(), "Conflict: Request already sent");
    assert_eq!(not_found.to_string(), "Resource not found: No user named @maria");
    assert_eq!(authentication.to_string(), "Authentication error: Session expired");
    assert_eq!(backend.to_string(), "Backend error: 503 Service Unavailable");
    assert!(storage.to_string().contains("Storage error:"));
    assert!(internal.to_string().contains("Internal error:"));
}

#[test]
fn test_user_errors_are_classified() {
    assert!(CareError::Validation("x".into()).is_user_error());
    assert!(CareError::Conflict("x".into()).is_user_error());
    assert!(CareError::NotFound("x".into()).is_user_error());
    assert!(!CareError::Backend("x".into()).is_user_error());
    assert!(!CareError::Storage(eyre::eyre!("x")).is_user_error());
}

#[test]
fn test_internal_error_keeps_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let care_error = CareError::Internal(Box::new(io_error));

    assert!(care_error.source().is_some());
    assert!(care_error.to_string().contains("IO error"));
}

#[test]
fn test_storage_from_report() {
    let result: CareResult<()> = Err(eyre::eyre!("read failed").into());

    match result {
        Err(CareError::Storage(report)) => assert!(report.to_string().contains("read failed")),
        other => panic!("unexpected result: {:?}", other),
    }
}
