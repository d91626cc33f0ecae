use axum::{
    body::Body,
    http::header::CONTENT_TYPE,
    response::Response,
};
use axum_htmx::HX_REDIRECT;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_html_content_type(response: &Response<Body>) {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .expect("content-type header missing");

    assert_eq!(content_type, "text/html; charset=utf-8");
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = response
        .headers()
        .get(HX_REDIRECT)
        .expect("Headers missing hx-redirect")
        .to_str()
        .expect("Could not convert to str");

    assert_eq!(location, endpoint);
}

/// Read the body of an action response as JSON.
pub(crate) async fn parse_action_result(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    serde_json::from_slice(&body).expect("Could not parse response body as JSON")
}

/// Assert that `result` is a successful action result and return its data.
#[track_caller]
pub(crate) fn must_get_action_data(result: &Value) -> &Value {
    assert_eq!(result["success"], true, "want a successful result, got {result}");

    result
        .get("data")
        .unwrap_or_else(|| panic!("successful result has no data: {result}"))
}

/// Assert that `result` is a failed action result whose error starts with `want_prefix`.
#[track_caller]
pub(crate) fn assert_action_failure(result: &Value, want_prefix: &str) {
    assert_eq!(result["success"], false, "want a failed result, got {result}");
    assert!(result.get("data").is_none(), "failed result has data: {result}");

    let error = result["error"]
        .as_str()
        .unwrap_or_else(|| panic!("failed result has no error message: {result}"));
    assert!(
        error.starts_with(want_prefix),
        "want error starting with {want_prefix:?}, got {error:?}"
    );
}
