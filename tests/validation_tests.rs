//! Integration tests for request validation at the pipeline boundary.

mod common;

use common::{TempStorage, pipeline, request_json, request_with};
use serde_json::json;
use webshot_api::factory::mock::MockBrowserFactory;
use webshot_api::prelude::*;
use webshot_api::service::{FailureKind, capture_from_payload, validate_value};

/// Submit `body` through the payload entry point and expect a rejection.
fn rejected(body: serde_json::Value) -> (CaptureError, usize, TempStorage) {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let bytes = serde_json::to_vec(&body).unwrap();
    let err = capture_from_payload(&pipeline, &bytes, Some(&ViewportLimits::default()))
        .unwrap_err();

    (err, seen.launches(), storage)
}

#[test]
fn test_parent_directory_file_name_never_reaches_pipeline() {
    let (err, launches, storage) = rejected(request_json("../../etc/passwd"));

    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(err.field(), Some("fileName"));
    assert_eq!(err.status_code(), 400);
    assert_eq!(launches, 0);
    assert!(!storage.path().exists());
}

#[test]
fn test_absolute_file_name_rejected() {
    for name in ["/etc/passwd.png", "\\windows\\shot.png", "dir/shot.png"] {
        let (err, launches, _storage) = rejected(request_json(name));
        assert_eq!(err.field(), Some("fileName"), "{}", name);
        assert_eq!(launches, 0, "{}", name);
    }
}

#[test]
fn test_url_without_scheme_rejected_before_launch() {
    let (err, launches, _storage) = rejected(request_with("a.png", "url", json!("not-a-url")));

    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(err.field(), Some("url"));
    assert_eq!(launches, 0);
}

#[test]
fn test_non_http_schemes_rejected() {
    for url in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)"] {
        let (err, launches, _storage) = rejected(request_with("a.png", "url", json!(url)));
        assert_eq!(err.field(), Some("url"), "{}", url);
        assert_eq!(launches, 0);
    }
}

#[test]
fn test_each_missing_field_is_named() {
    for field in webshot_api::service::REQUIRED_FIELDS {
        let mut body = request_json("a.png");
        body.as_object_mut().unwrap().remove(field);

        let err = validate_value(&body, None).unwrap_err();
        assert_eq!(err.field(), Some(field), "missing {}", field);
    }
}

#[test]
fn test_unknown_wait_strategy_rejected() {
    let (err, launches, _storage) =
        rejected(request_with("a.png", "waitStrategy", json!("whenever")));

    assert_eq!(err.field(), Some("waitStrategy"));
    assert_eq!(launches, 0);
}

#[test]
fn test_all_wait_strategies_accepted() {
    for strategy in WaitStrategy::ALL {
        let body = request_with("a.png", "waitStrategy", json!(strategy.as_str()));
        let request = validate_value(&body, None).unwrap();
        assert_eq!(request.wait_strategy, strategy);
    }
}

#[test]
fn test_viewport_outside_limits_rejected() {
    let (err, launches, _storage) = rejected(request_with("a.png", "viewportWidth", json!(10_000)));

    assert_eq!(err.field(), Some("viewportWidth"));
    assert_eq!(launches, 0);
}

#[test]
fn test_non_positive_viewport_rejected_without_limits() {
    for value in [json!(0), json!(-5), json!(12.5)] {
        let body = request_with("a.png", "viewportHeight", value.clone());
        let err = validate_value(&body, None).unwrap_err();
        assert_eq!(err.field(), Some("viewportHeight"), "{}", value);
    }
}

#[test]
fn test_unsupported_extension_rejected() {
    let (err, launches, _storage) = rejected(request_json("shot.gif"));

    assert_eq!(err.field(), Some("fileName"));
    assert_eq!(launches, 0);
}

#[test]
fn test_rejection_result_body() {
    let (err, _, _storage) = rejected(request_json("../../etc/passwd"));
    let result = CaptureResult::from(&err);

    assert!(!result.success);
    assert!(result.path.is_none());

    let descriptor = result.error.unwrap();
    assert_eq!(descriptor.kind, FailureKind::Validation);
    assert_eq!(descriptor.code, "VALIDATION_FAILED");
    assert_eq!(descriptor.field.as_deref(), Some("fileName"));
}
