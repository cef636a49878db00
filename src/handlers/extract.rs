//! Request body extraction

use crate::models::ApiResponse;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// JSON body whose rejection is answered with the API envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(BadJson))]
pub struct ApiJson<T>(pub T);

/// Unreadable or ill-typed request body
#[derive(Debug)]
pub struct BadJson(JsonRejection);

impl From<JsonRejection> for BadJson {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for BadJson {
    fn into_response(self) -> Response {
        let message = self.0.body_text();
        tracing::debug!("Rejected request body: {}", message);
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(message)),
        )
            .into_response()
    }
}
