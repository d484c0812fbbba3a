use crate::erx::LayoutedC;
use crate::web::except::Except;
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Out<T: Serialize> {
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

const API_HEADERS: [(&str, &str); 2] = [("Content-Type", "application/json"), ("Powered-By", "lms-admin")];

impl<T: Serialize> Out<T> {
    pub fn new(code: LayoutedC, message: Option<String>, data: Option<T>) -> Self {
        Out { code: code.into(), message, data }
    }

    pub fn code_message(code: LayoutedC, message: &str) -> Self {
        let message = if message.is_empty() { None } else { Some(message.to_string()) };
        Out { code: code.into(), message, data: None }
    }

    pub fn ok(data: T) -> Self {
        Out { code: LayoutedC::okay().into(), message: None, data: Some(data) }
    }

    /// serialize with an explicit status
    pub fn with_status(self, status: StatusCode) -> Response {
        use axum::response::IntoResponse;

        match serde_json::to_string(&self) {
            Ok(body) => (status, API_HEADERS, body).into_response(),
            Err(err) => {
                let body = Except::Unknown(err.to_string()).out::<()>();
                let body = serde_json::to_string(&body).unwrap_or(String::from("json serialization error"));
                (StatusCode::INTERNAL_SERVER_ERROR, API_HEADERS, body).into_response()
            },
        }
    }
}

impl<T: Serialize> axum::response::IntoResponse for Out<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}
