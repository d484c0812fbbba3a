use crate::conf;
use crate::web::context::Context;
use crate::web::cookie::{session_cookie, CookieJar};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

/// session ids are uuid v4, anything else is replaced
fn valid_session_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// Resolve the session cookie, issue a new one when absent or invalid, and
/// expose it to handlers as `Extension<Context>`.
pub async fn session_layer(State(session): State<Arc<conf::Session>>, mut req: Request, next: Next) -> Response {
    let existing = CookieJar::from_headers(req.headers()).get(&session.cookie).filter(|id| valid_session_id(id)).map(|id| id.to_string());

    let context = match existing {
        Some(id) => Context::new(&id, false),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            debug!("issued session {}", id);
            Context::new(&id, true)
        },
    };

    let sid = context.session().to_string();
    req.extensions_mut().insert(context);

    let mut response = next.run(req).await;

    // refresh max-age on every response so the cookie and the flash ttl line up
    if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&session.cookie, &sid, session.ttl_secs)) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        let session = Arc::new(conf::Session::default());
        Router::new()
            .route("/", get(|Extension(c): Extension<Context>| async move { c.session().to_string() }))
            .route("/fresh", get(|Extension(c): Extension<Context>| async move { c.is_fresh().to_string() }))
            .layer(axum::middleware::from_fn_with_state(session, session_layer))
    }

    #[tokio::test]
    async fn test_issues_cookie_when_missing() {
        let response = app().oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("lms_admin_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_keeps_existing_session() {
        let sid = uuid::Uuid::new_v4().to_string();
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, format!("lms_admin_session={}", sid))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, sid.as_bytes());
    }

    #[tokio::test]
    async fn test_replaces_forged_session() {
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "lms_admin_session=../../etc")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(uuid::Uuid::parse_str(std::str::from_utf8(&body).unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_marks_issued_session_fresh() {
        let response = app().oneshot(Request::builder().uri("/fresh").body(Body::empty()).unwrap()).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, "true".as_bytes());

        let request = Request::builder()
            .uri("/fresh")
            .header(header::COOKIE, format!("lms_admin_session={}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, "false".as_bytes());
    }
}
