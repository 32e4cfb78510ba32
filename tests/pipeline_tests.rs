//! Integration tests for the capture pipeline.

mod common;

use common::{TempStorage, pipeline, request_json, request_with};
use serde_json::json;
use std::time::{Duration, Instant};
use webshot_api::factory::mock::{MockBrowserFactory, MockStage};
use webshot_api::prelude::*;
use webshot_api::service::{FailureKind, StoredScreenshot, capture_from_payload, validate_value};

fn request(body: serde_json::Value) -> CaptureRequest {
    validate_value(&body, None).unwrap()
}

/// The documented end-to-end example.
#[test]
fn test_full_page_jpeg_stored_under_public_path() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new().with_document_height(4000);
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let body = json!({
        "url": "https://example.com",
        "viewportWidth": 1280,
        "viewportHeight": 1024,
        "fullPage": true,
        "waitStrategy": "load-complete",
        "fileName": "shot1.jpg"
    });
    let stored = pipeline.run(&request(body)).unwrap();

    assert_eq!(stored.public_path, "/uploads/shot1.jpg");
    assert_eq!(stored.format, ImageFormat::Jpeg);
    assert_eq!(stored.file_path, storage.path().join("shot1.jpg"));

    let bytes = std::fs::read(&stored.file_path).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);

    assert_eq!(
        seen.navigations(),
        vec![("https://example.com/".to_string(), WaitStrategy::LoadComplete)]
    );
    assert_eq!(seen.closes(), 1);

    let outcome: std::result::Result<StoredScreenshot, CaptureError> = Ok(stored);
    let result = CaptureResult::from(&outcome);
    assert!(result.success);
    assert_eq!(result.message, CaptureResult::SUCCESS_MESSAGE);
    assert_eq!(result.path.as_deref(), Some("/uploads/shot1.jpg"));
    assert!(result.error.is_none());
}

#[test]
fn test_full_page_height_covers_document() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new().with_document_height(5000);
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let body = request_with("tall.png", "fullPage", json!(true));
    pipeline.run(&request(body)).unwrap();

    let surfaces = seen.rendered_surfaces();
    assert_eq!(surfaces.len(), 1);
    assert_eq!(surfaces[0].width, 1280);
    assert!(surfaces[0].height >= 1024);
    assert_eq!(surfaces[0].height, 5000);
}

#[test]
fn test_viewport_only_capture_keeps_viewport_height() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new().with_document_height(5000);
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    pipeline.run(&request(request_json("fold.png"))).unwrap();

    assert_eq!(seen.rendered_surfaces(), vec![Viewport::new(1280, 1024)]);
}

/// Each failing stage still tears the session down exactly once.
#[test]
fn test_one_teardown_per_failing_stage() {
    let cases = [
        (MockStage::OpenPage, FailureKind::Configuration),
        (MockStage::Navigate, FailureKind::Navigation),
        (MockStage::Render, FailureKind::Render),
    ];

    for (stage, expected) in cases {
        let storage = TempStorage::new();
        let factory = MockBrowserFactory::failing_at(stage, "boom");
        let seen = factory.observer();
        let pipeline = pipeline(factory, &storage);

        let err = pipeline.run(&request(request_json("x.png"))).unwrap_err();

        assert_eq!(err.kind(), expected, "stage {:?}", stage);
        assert_eq!(err.detail(), "boom");
        assert_eq!(seen.launches(), 1, "stage {:?}", stage);
        assert_eq!(seen.closes(), 1, "stage {:?}", stage);
        assert!(storage.files().is_empty(), "stage {:?}", stage);

        let stats = pipeline.stats();
        assert!(stats.is_idle(), "stage {:?}: {}", stage, stats);
        assert_eq!(stats.captures_failed, 1);
    }
}

#[test]
fn test_storage_failure_still_tears_down() {
    let storage = TempStorage::new();
    // A file where the storage directory should be.
    std::fs::write(storage.path(), b"occupied").unwrap();

    let factory = MockBrowserFactory::new();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let err = pipeline.run(&request(request_json("x.png"))).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Storage);
    assert_eq!(seen.closes(), 1);

    let _ = std::fs::remove_file(storage.path());
}

#[test]
fn test_unreachable_host_is_navigation_failure() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::failing_at(MockStage::Navigate, "net::ERR_NAME_NOT_RESOLVED");
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let body = request_with("x.png", "url", json!("https://unreachable.invalid"));
    let err = pipeline.run(&request(body)).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Navigation);
    assert!(err.to_string().contains("Navigation failed"));
    assert!(err.to_string().contains("ERR_NAME_NOT_RESOLVED"));
    assert_eq!(seen.closes(), 1);
    assert!(storage.files().is_empty());

    let result = CaptureResult::from(&err);
    assert!(!result.success);
    assert!(result.path.is_none());
    assert_eq!(result.error.unwrap().code, "NAVIGATION_FAILED");
}

#[test]
fn test_never_ready_navigation_times_out_within_bound() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::hanging_navigation();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let started = Instant::now();
    let err = pipeline.run(&request(request_json("slow.png"))).unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err, CaptureError::NavigationTimeout(err.detail().to_string()));
    assert_eq!(err.kind(), FailureKind::Navigation);
    assert!(elapsed >= pipeline.navigation_timeout());
    assert!(elapsed < pipeline.navigation_timeout() + Duration::from_secs(5));
    assert_eq!(seen.closes(), 1);
}

/// The navigation request itself blocks, not just the readiness wait.
#[test]
fn test_blocked_navigation_request_times_out_within_bound() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::stuck_navigation();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let started = Instant::now();
    let err = pipeline.run(&request(request_json("stuck.png"))).unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, CaptureError::NavigationTimeout(_)), "{:?}", err);
    assert_eq!(err.status_code(), 504);
    assert!(elapsed >= pipeline.navigation_timeout());
    assert!(elapsed < pipeline.navigation_timeout() + Duration::from_secs(2));
    assert_eq!(seen.closes(), 1);
    assert!(storage.files().is_empty());

    // Teardown unblocks the abandoned request.
    let mut waited = Duration::ZERO;
    while seen.released_navigations() == 0 && waited < Duration::from_secs(5) {
        std::thread::sleep(Duration::from_millis(20));
        waited += Duration::from_millis(20);
    }
    assert_eq!(seen.released_navigations(), 1);
    assert!(pipeline.stats().is_idle());
}

#[test]
fn test_launch_failure_has_nothing_to_tear_down() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::always_fails("chrome not found");
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let err = pipeline.run(&request(request_json("x.png"))).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Launch);
    assert_eq!(err.status_code(), 503);
    assert!(err.is_retryable());
    assert_eq!(seen.closes(), 0);
    assert!(!storage.path().exists());
}

#[test]
fn test_identical_requests_use_independent_sessions() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    let first = pipeline.run(&request(request_json("a.png"))).unwrap();
    let second = pipeline.run(&request(request_json("b.png"))).unwrap();

    assert_ne!(first.file_path, second.file_path);
    assert_eq!(seen.launches(), 2);
    assert_eq!(seen.closes(), 2);
    assert_eq!(storage.files(), vec!["a.png", "b.png"]);

    let stats = pipeline.stats();
    assert_eq!(stats.sessions_launched, 2);
    assert_eq!(stats.sessions_torn_down, 2);
    assert_eq!(stats.captures_succeeded, 2);
}

#[test]
fn test_failure_does_not_affect_next_request() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::fail_after_n(1, "out of processes");
    let pipeline = pipeline(factory, &storage);

    assert!(pipeline.run(&request(request_json("first.png"))).is_ok());
    let err = pipeline.run(&request(request_json("second.png"))).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Launch);
    assert_eq!(storage.files(), vec!["first.png"]);
}

#[test]
fn test_concurrent_captures_each_launch_a_session() {
    let storage = TempStorage::new();
    let factory = MockBrowserFactory::new();
    let seen = factory.observer();
    let pipeline = pipeline(factory, &storage);

    std::thread::scope(|scope| {
        for i in 0..8 {
            let pipeline = pipeline.clone();
            scope.spawn(move || {
                let name = format!("shot-{}.png", i);
                pipeline.run(&request(request_json(&name))).unwrap();
            });
        }
    });

    assert_eq!(seen.launches(), 8);
    assert_eq!(seen.closes(), 8);
    assert_eq!(storage.files().len(), 8);
    assert!(pipeline.stats().is_idle());
}

#[test]
fn test_capture_from_payload_end_to_end() {
    let storage = TempStorage::new();
    let pipeline = pipeline(MockBrowserFactory::new(), &storage);

    let body = serde_json::to_vec(&request_json("payload.webp")).unwrap();
    let stored = capture_from_payload(&pipeline, &body, Some(&ViewportLimits::default())).unwrap();

    assert_eq!(stored.public_path, "/uploads/payload.webp");
    assert_eq!(stored.format, ImageFormat::Webp);
}
