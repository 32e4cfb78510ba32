//! Request validation.
//!
//! Turns an untrusted request body into a [`CaptureRequest`] before any
//! browser is launched. Checks run in a fixed order and stop at the first
//! problem, which is reported as [`CaptureError::Validation`] naming the
//! offending field:
//!
//! 1. the body is a JSON object carrying every required field
//! 2. `url` is an absolute `http`/`https` URL with a host
//! 3. `viewportWidth` / `viewportHeight` are positive integers (within limits, if configured)
//! 4. `fullPage` is a boolean
//! 5. `waitStrategy` is a known strategy
//! 6. `fileName` is a bare file name with a supported image extension
//!
//! # Example
//!
//! ```rust
//! use webshot_api::service::{validate_payload, WaitStrategy};
//!
//! let body = br#"{
//!     "url": "https://example.com",
//!     "viewportWidth": 1280,
//!     "viewportHeight": "1024",
//!     "fullPage": true,
//!     "waitStrategy": "load-complete",
//!     "fileName": "shot1.jpg"
//! }"#;
//!
//! let request = validate_payload(body, None).unwrap();
//! assert_eq!(request.viewport.height, 1024);
//! assert_eq!(request.wait_strategy, WaitStrategy::LoadComplete);
//! ```

use std::path::{Component, Path};

use serde_json::{Map, Value};
use url::Url;

use super::types::{CaptureError, CaptureRequest, FileName, ImageFormat, Viewport, WaitStrategy};
use crate::config::ViewportLimits;

/// Wire names of the request fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "url",
    "viewportWidth",
    "viewportHeight",
    "fullPage",
    "waitStrategy",
    "fileName",
];

/// Longest accepted file name, in bytes.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Longest accepted target URL, in bytes.
pub const MAX_URL_LEN: usize = 2048;

/// Validate a raw JSON request body.
///
/// # Errors
///
/// [`CaptureError::Validation`] with field `body` if the bytes are not a
/// JSON object, otherwise as for [`validate_value`].
pub fn validate_payload(
    body: &[u8],
    limits: Option<&ViewportLimits>,
) -> Result<CaptureRequest, CaptureError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        log::debug!("Request body is not valid JSON: {}", e);
        CaptureError::validation("body", format!("malformed JSON: {}", e))
    })?;

    validate_value(&value, limits)
}

/// Validate an already-parsed JSON request.
///
/// # Errors
///
/// [`CaptureError::Validation`] naming the first field that fails.
pub fn validate_value(
    value: &Value,
    limits: Option<&ViewportLimits>,
) -> Result<CaptureRequest, CaptureError> {
    let fields = value
        .as_object()
        .ok_or_else(|| CaptureError::validation("body", "expected a JSON object"))?;

    for name in REQUIRED_FIELDS {
        if fields.get(name).is_none_or(Value::is_null) {
            return Err(CaptureError::validation(name, "field is required"));
        }
    }

    let target_url = validate_url(str_field(fields, "url")?)?;

    let viewport = Viewport::new(
        dimension(fields, "viewportWidth")?,
        dimension(fields, "viewportHeight")?,
    );
    if let Some(limits) = limits {
        check_limits(viewport, limits)?;
    }

    let full_page = fields
        .get("fullPage")
        .and_then(Value::as_bool)
        .ok_or_else(|| CaptureError::validation("fullPage", "must be a boolean"))?;

    let wait_strategy: WaitStrategy = str_field(fields, "waitStrategy")?
        .parse()
        .map_err(|reason: String| CaptureError::validation("waitStrategy", reason))?;

    let (file_name, format) = validate_file_name(str_field(fields, "fileName")?)?;

    log::trace!(
        "Validated capture request: {} at {} (full_page={}, wait={}) -> {}",
        super::truncate_url(target_url.as_str(), 100),
        viewport,
        full_page,
        wait_strategy,
        file_name
    );

    Ok(CaptureRequest {
        target_url,
        viewport,
        full_page,
        wait_strategy,
        file_name,
        format,
    })
}

/// Parse a target URL, accepting only absolute `http`/`https` URLs with a host.
///
/// ```rust
/// use webshot_api::service::validate_url;
///
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("not-a-url").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(raw: &str) -> Result<Url, CaptureError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CaptureError::validation("url", "must not be empty"));
    }
    if raw.len() > MAX_URL_LEN {
        return Err(CaptureError::validation(
            "url",
            format!("must be at most {} characters", MAX_URL_LEN),
        ));
    }

    let url = Url::parse(raw).map_err(|e| {
        log::debug!("URL validation failed for '{}': {}", super::truncate_url(raw, 100), e);
        CaptureError::validation("url", format!("not a valid absolute URL: {}", e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CaptureError::validation(
            "url",
            format!("scheme must be http or https, got '{}'", url.scheme()),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(CaptureError::validation("url", "must include a host"));
    }

    Ok(url)
}

/// Check that `raw` is a bare file name and detect its image format.
///
/// Rejects empty names, `.` and `..`, path separators (`/` and `\`),
/// anything the platform parses as more than one path component (such as a
/// Windows drive prefix), control characters, names over [`MAX_FILE_NAME_LEN`]
/// bytes and extensions other than `png`, `jpg`, `jpeg` and `webp`.
///
/// ```rust
/// use webshot_api::service::{validate_file_name, ImageFormat};
///
/// let (name, format) = validate_file_name("shot1.jpg").unwrap();
/// assert_eq!(name.as_str(), "shot1.jpg");
/// assert_eq!(format, ImageFormat::Jpeg);
///
/// assert!(validate_file_name("v1..2.png").is_ok());
/// assert!(validate_file_name("../../etc/passwd").is_err());
/// assert!(validate_file_name("/tmp/shot.png").is_err());
/// ```
pub fn validate_file_name(raw: &str) -> Result<(FileName, ImageFormat), CaptureError> {
    let reject = |reason: &str| Err(CaptureError::validation("fileName", reason));

    if raw.is_empty() {
        return reject("must not be empty");
    }
    if raw.len() > MAX_FILE_NAME_LEN {
        return reject("must be at most 255 bytes");
    }
    if raw == "." || raw == ".." {
        return reject("must not be '.' or '..'");
    }
    if raw.contains(['/', '\\']) {
        return reject("must not contain path separators");
    }
    if !is_single_component(raw) {
        return reject("must be a bare file name");
    }
    if raw.chars().any(char::is_control) {
        return reject("must not contain control characters");
    }
    if raw.trim() != raw {
        return reject("must not start or end with whitespace");
    }

    let format = match ImageFormat::from_file_name(raw) {
        Some(format) => format,
        None => return reject("extension must be one of .png, .jpg, .jpeg, .webp"),
    };

    if raw.rsplit_once('.').is_some_and(|(stem, _)| stem.is_empty()) {
        return reject("must have a name before the extension");
    }

    Ok((FileName::from_validated(raw.to_string()), format))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn str_field<'a>(fields: &'a Map<String, Value>, name: &'static str) -> Result<&'a str, CaptureError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| CaptureError::validation(name, "must be a string"))
}

/// Accepts JSON integers and strings of decimal digits.
fn dimension(fields: &Map<String, Value>, name: &'static str) -> Result<u32, CaptureError> {
    let invalid = || CaptureError::validation(name, "must be a positive integer");

    let parsed = match fields.get(name) {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    match parsed {
        Some(0) | None => Err(invalid()),
        Some(n) => Ok(n),
    }
}

fn check_limits(viewport: Viewport, limits: &ViewportLimits) -> Result<(), CaptureError> {
    if !limits.width.contains(&viewport.width) {
        return Err(CaptureError::validation(
            "viewportWidth",
            format!(
                "must be between {} and {}",
                limits.width.start(),
                limits.width.end()
            ),
        ));
    }
    if !limits.height.contains(&viewport.height) {
        return Err(CaptureError::validation(
            "viewportHeight",
            format!(
                "must be between {} and {}",
                limits.height.start(),
                limits.height.end()
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
