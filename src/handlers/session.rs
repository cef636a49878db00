//! Sign-in handlers
//!
//! Identity and role are taken at face value; there is no password check.

use crate::models::*;
use crate::validation::validate_login;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use super::{ApiJson, AppState};

pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    let input = input.trimmed();
    if let Err(e) = validate_login(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<User>::error(e.to_string())),
        );
    }

    let user = User {
        name: input.name,
        email: input.email,
        role: input.role,
        dept: if input.role == Role::Staff {
            input.dept
        } else {
            None
        },
    };

    let mut desk = state.desk.write().await;
    // A new sign-in never inherits the previous user's filters or draft
    desk.logout();
    desk.session.login(user.clone());

    (StatusCode::OK, Json(ApiResponse::success(user)))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    desk.logout();
    (StatusCode::OK, Json(ApiResponse::<()>::empty()))
}

pub async fn get_current_user(Extension(user): Extension<User>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(user)))
}
