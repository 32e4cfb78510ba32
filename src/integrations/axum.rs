//! Axum framework integration.
//!
//! Exposes the capture service over HTTP:
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | POST | `/api/web-screenshot` | [`capture_screenshot`] | Capture a page |
//! | any other | `/api/web-screenshot` | [`method_not_allowed`] | 405 with a JSON body |
//! | GET | `/health` | [`health_check`] | Liveness check |
//! | GET | `/stats` | [`capture_stats`] | Session and capture counters |
//! | GET | `<public_path>/*` | `ServeDir` | Stored screenshots |
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webshot_api::prelude::*;
//! use webshot_api::integrations::axum::{AppState, router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CaptureConfig::default();
//!     let factory = Arc::new(ChromeBrowserFactory::with_defaults());
//!     let app = router(AppState::from_config(factory, config));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Timeouts and Concurrency
//!
//! The pipeline blocks, so each capture runs in `spawn_blocking`. The handler
//! stops waiting after `operation_timeout` and answers 504; the pipeline
//! itself keeps running until its session is torn down.
//!
//! With `max_concurrent_captures` set, requests queue for a permit after
//! validation and hold it until teardown finishes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Semaphore;
use tower_http::services::ServeDir;

use crate::config::CaptureConfig;
use crate::factory::BrowserFactory;
use crate::service::{
    CaptureError, CapturePipeline, CaptureResult, HealthResponse, StoredScreenshot,
};
use crate::stats::CaptureStats;

/// Path of the capture endpoint.
pub const CAPTURE_ROUTE: &str = "/api/web-screenshot";

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pipeline: CapturePipeline,
    config: Arc<CaptureConfig>,
    permits: Option<Arc<Semaphore>>,
}

impl AppState {
    /// Create state around an existing pipeline.
    ///
    /// The concurrency cap is taken from `config.max_concurrent_captures`.
    pub fn new(pipeline: CapturePipeline, config: CaptureConfig) -> Self {
        let permits = config
            .max_concurrent_captures
            .map(|max| Arc::new(Semaphore::new(max)));

        Self {
            pipeline,
            config: Arc::new(config),
            permits,
        }
    }

    /// Create state with a pipeline built from `config`.
    pub fn from_config(factory: Arc<dyn BrowserFactory>, config: CaptureConfig) -> Self {
        let pipeline = CapturePipeline::from_config(factory, &config);
        Self::new(pipeline, config)
    }

    /// The capture pipeline.
    pub fn pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }

    /// The active configuration.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pipeline", &self.pipeline)
            .field("config", &self.config)
            .field(
                "available_permits",
                &self.permits.as_ref().map(|p| p.available_permits()),
            )
            .finish()
    }
}

/// Type alias for the Axum `State` extractor with [`AppState`].
pub type CaptureState = State<AppState>;

/// Build the router with every route of the service.
///
/// Stored screenshots are served from `storage_dir` under `public_path`.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.storage_dir);
    let public_path = state.config.public_path.clone();

    let routes: Router<AppState> = Router::new()
        .route(
            CAPTURE_ROUTE,
            post(capture_screenshot).fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .route("/stats", get(capture_stats));

    // Axum refuses to nest at the root.
    let routes = if public_path == "/" {
        routes.fallback_service(static_files)
    } else {
        routes.nest_service(&public_path, static_files)
    };

    routes.with_state(state)
}

/// Capture a web page.
///
/// # Endpoint
///
/// ```text
/// POST /api/web-screenshot
/// Content-Type: application/json
/// ```
///
/// # Request Body
///
/// ```json
/// {
///     "url": "https://example.com",
///     "viewportWidth": 1280,
///     "viewportHeight": 1024,
///     "fullPage": true,
///     "waitStrategy": "load-complete",
///     "fileName": "shot1.jpg"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {"success": true, "message": "Screenshot captured successfully", "path": "/uploads/shot1.jpg"}
/// ```
///
/// On failure the status follows [`CaptureError::status_code`] and the body
/// carries `success: false`, the message and an `error` descriptor.
///
/// # Example Request
///
/// ```bash
/// curl -X POST http://localhost:3000/api/web-screenshot \
///   -H "Content-Type: application/json" \
///   -d '{"url":"https://example.com","viewportWidth":1280,"viewportHeight":1024,"fullPage":false,"waitStrategy":"network-idle-strict","fileName":"example.png"}'
/// ```
pub async fn capture_screenshot(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<CaptureResult>) {
    let operation_timeout = state.config.operation_timeout;

    let result = tokio::time::timeout(operation_timeout, run_capture(state, body)).await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(_elapsed) => {
            log::error!(
                "⏱️ Capture timed out after {} seconds",
                operation_timeout.as_secs()
            );
            Err(CaptureError::Timeout(format!(
                "Operation timed out after {} seconds",
                operation_timeout.as_secs()
            )))
        }
    };

    build_response(&outcome)
}

/// Answer any method other than POST on the capture endpoint.
pub async fn method_not_allowed() -> (StatusCode, Json<CaptureResult>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(CaptureResult {
            success: false,
            message: "Method not allowed".to_string(),
            path: None,
            error: None,
        }),
    )
}

/// Liveness seen. Always 200 while the server answers.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Current session and capture counters.
pub async fn capture_stats(State(state): State<AppState>) -> Json<CaptureStats> {
    Json(state.pipeline.stats())
}

// ============================================================================
// Internal
// ============================================================================

/// Validate, wait for a permit, then run the pipeline on the blocking pool.
async fn run_capture(state: AppState, body: Bytes) -> Result<StoredScreenshot, CaptureError> {
    let request = state
        .pipeline
        .prepare(&body, state.config.viewport_limits.as_ref())?;

    let permit = match &state.permits {
        Some(permits) => Some(
            Arc::clone(permits)
                .acquire_owned()
                .await
                .map_err(|e| CaptureError::Internal(e.to_string()))?,
        ),
        None => None,
    };

    let pipeline = state.pipeline.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        pipeline.run(&request)
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(join_err) => {
            log::error!("Blocking task error: {}", join_err);
            Err(CaptureError::Internal(join_err.to_string()))
        }
    }
}

/// Map an outcome to its status code and JSON body.
fn build_response(
    outcome: &Result<StoredScreenshot, CaptureError>,
) -> (StatusCode, Json<CaptureResult>) {
    let status = match outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            let status = status_for(e);
            log::warn!("Capture error: {} (HTTP {})", e, status.as_u16());
            status
        }
    };

    (status, Json(CaptureResult::from(outcome)))
}

fn status_for(error: &CaptureError) -> StatusCode {
    StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_alias_compiles() {
        fn _accepts_capture_state(_: CaptureState) {}
    }

    #[test]
    fn test_status_for_each_failure() {
        assert_eq!(
            status_for(&CaptureError::validation("url", "bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&CaptureError::Launch("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&CaptureError::NavigationTimeout("x".into())),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&CaptureError::Render("x".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_semaphore_only_when_capped() {
        use crate::factory::mock::MockBrowserFactory;

        let factory = Arc::new(MockBrowserFactory::new());
        let state = AppState::from_config(factory.clone(), CaptureConfig::default());
        assert!(state.permits.is_none());

        let config = crate::config::CaptureConfigBuilder::new()
            .max_concurrent_captures(2)
            .build()
            .unwrap();
        let state = AppState::from_config(factory, config);
        assert_eq!(
            state.permits.as_ref().map(|p| p.available_permits()),
            Some(2)
        );
    }
}
