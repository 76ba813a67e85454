//! Custom assertion macros
//!
//! Provides assertions for the JSON error body every failed request carries.

/// Assert a response is a JSON error with the given status
///
/// The body must look like `{"error": "...", "status": <code>}`.
#[macro_export]
macro_rules! assert_api_error {
    ($response:expr, $status:expr) => {{
        let (status, body): (axum::http::StatusCode, serde_json::Value) = $response;
        assert_eq!(status, $status, "unexpected status, body: {}", body);
        assert_eq!(body["status"], $status.as_u16(), "body: {}", body);
        assert!(body["error"].is_string(), "missing error message: {}", body);
        body
    }};
    ($response:expr, $status:expr, $needle:expr) => {{
        let body = $crate::assert_api_error!($response, $status);
        let message = body["error"].as_str().unwrap_or_default();
        assert!(
            message.contains($needle),
            "Expected '{}' to contain '{}'",
            message,
            $needle
        );
        body
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
