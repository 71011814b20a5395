// --- File: crates/paybridge_common/src/http.rs ---
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, PaybridgeError};

// Include the client module
pub mod client;

/// Extension trait for PaybridgeError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for PaybridgeError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Every error body has the same shape: {"error": "<message>"}
        let body = Json(json!({ "error": self.public_message() }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for PaybridgeError to make it easier to use in Axum handlers.
impl IntoResponse for PaybridgeError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// JSON body extractor whose rejections use the standard error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PaybridgeError))]
pub struct AppJson<T>(pub T);

/// Query string extractor whose rejections use the standard error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PaybridgeError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for PaybridgeError {
    fn from(rejection: JsonRejection) -> Self {
        PaybridgeError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for PaybridgeError {
    fn from(rejection: QueryRejection) -> Self {
        PaybridgeError::ValidationError(rejection.body_text())
    }
}
