use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use rstest::rstest;
use seniorcare_core::errors::CareError;
use seniorcare_sync::{
    RestBackend,
    config::BackendConfig,
    rest::{between_filter, classify, eq},
};
use uuid::Uuid;

fn config(url: &str) -> BackendConfig {
    BackendConfig {
        url: url.to_string(),
        anon_key: "anon-key".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}

#[test]
fn test_unique_violation_is_conflict() {
    let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#;
    let err = classify(StatusCode::CONFLICT, body);

    assert!(matches!(err, CareError::Conflict(ref m) if m.contains("duplicate key")));
}

#[rstest]
#[case(StatusCode::NOT_ACCEPTABLE, r#"{"code":"PGRST116","message":"0 rows"}"#)]
#[case(StatusCode::NOT_FOUND, r#"{"message":"relation does not exist"}"#)]
fn test_missing_rows_are_not_found(#[case] status: StatusCode, #[case] body: &str) {
    assert!(matches!(classify(status, body), CareError::NotFound(_)));
}

#[rstest]
#[case(StatusCode::UNAUTHORIZED)]
#[case(StatusCode::FORBIDDEN)]
fn test_auth_failures(#[case] status: StatusCode) {
    assert!(matches!(
        classify(status, r#"{"message":"JWT expired"}"#),
        CareError::Authentication(_)
    ));
}

#[test]
fn test_other_failures_are_backend_errors() {
    let err = classify(StatusCode::BAD_GATEWAY, "upstream unavailable\n");

    match err {
        CareError::Backend(message) => {
            assert!(message.starts_with("502"));
            assert!(message.ends_with("upstream unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_filters() {
    let a = Uuid::nil();
    let b = Uuid::new_v4();

    assert_eq!(eq(false), "eq.false");
    assert_eq!(eq(a), format!("eq.{}", a));
    assert_eq!(
        between_filter(a, b),
        format!(
            "(and(from_user_id.eq.{a},to_user_id.eq.{b}),and(from_user_id.eq.{b},to_user_id.eq.{a}))"
        )
    );
}

#[rstest]
#[case("https://project.example.co", "https://project.example.co/rest/v1")]
#[case("https://project.example.co/", "https://project.example.co/rest/v1")]
fn test_rest_url(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(config(url).rest_url(), expected);
}

#[test]
fn test_table_url() {
    let backend = RestBackend::new(&config("https://project.example.co")).unwrap();

    assert_eq!(
        backend.table_url("friendship_requests"),
        "https://project.example.co/rest/v1/friendship_requests"
    );
}
