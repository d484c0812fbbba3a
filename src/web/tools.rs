use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

/// 302 Found to `target`
pub fn found(target: &str) -> Response {
    match HeaderValue::from_str(target) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(err) => {
            warn!("redirect target {:?} is not a valid Location: {}", target, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}

/// form path -> its success page
pub fn success_path(form_path: &str) -> String {
    crate::web::url::join(form_path, "success")
}
