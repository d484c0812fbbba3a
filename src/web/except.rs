use crate::erx::{Erx, Layouted, PreL4};
use crate::web::api::Out;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

// Except is used in actions.
// It wraps the errors that escape the form pipeline and converts to a response.
// Validation failures never become an Except, they are flashed back to the form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Except {
    NotFound,
    InternalServerError,
    Unknown(String),
    /// submitted input has the wrong shape, resubmitting it will not help
    MalformedInput(String),
    /// a downstream service failed after validation passed
    RemoteService(String),
}

impl Except {
    pub fn status(&self) -> StatusCode {
        match self {
            Except::NotFound => StatusCode::NOT_FOUND,
            Except::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Except::RemoteService(_) => StatusCode::BAD_GATEWAY,
            Except::InternalServerError | Except::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// convert to response object
    pub fn out<T>(&self) -> Out<T>
    where
        T: Serialize,
    {
        match self {
            Except::NotFound => Out::code_message(Layouted::common(PreL4::COMM.four(), "0404"), "not found"),
            Except::InternalServerError => {
                Out::code_message(Layouted::common(PreL4::COMM.four(), "0500"), "internal server error")
            },
            Except::Unknown(m) => {
                let m = if m.is_empty() { "Something unexpected happened, please try again later." } else { m };
                Out::code_message(Layouted::common(PreL4::COMM.four(), "9999"), m)
            },
            Except::MalformedInput(m) => {
                let m = if m.is_empty() { "malformed input" } else { m };
                Out::code_message(Layouted::common(PreL4::INPT.four(), "0400"), m)
            },
            Except::RemoteService(m) => {
                let m = if m.is_empty() { "remote service unavailable" } else { m };
                Out::code_message(Layouted::service(PreL4::REMO.four(), "0502"), m)
            },
        }
    }
}

impl From<Erx> for Except {
    fn from(erx: Erx) -> Self {
        if erx.is_malformed() {
            warn!("malformed input: {}", erx.description());
            return Except::MalformedInput(erx.message_string());
        }

        if erx.is_remote() {
            error!("remote service failure: {}", erx.description());
            return Except::RemoteService(erx.message_string());
        }

        error!("unexpected failure: {}", erx.description());
        Except::Unknown(String::new())
    }
}

impl IntoResponse for Except {
    fn into_response(self) -> Response {
        self.out::<()>().with_status(self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erx_classification() {
        assert_eq!(Except::from(Erx::malformed("answers missing")), Except::MalformedInput("answers missing".into()));
        assert_eq!(Except::from(Erx::remote("503 from quiz")), Except::RemoteService("503 from quiz".into()));
        assert_eq!(Except::from(Erx::new("disk full")), Except::Unknown(String::new()));
    }

    #[tokio::test]
    async fn test_status_and_body() {
        let response = Except::MalformedInput("answers missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["code"], "LMSA-COMM-INPT-0400");
        assert_eq!(v["message"], "answers missing");

        assert_eq!(Except::RemoteService(String::new()).into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(Except::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }
}
