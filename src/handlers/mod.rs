//! HTTP request handlers

pub mod complaints;
pub mod dashboards;
pub mod extract;
pub mod form;
pub mod middleware;
pub mod session;

#[cfg(test)]
mod tests;

pub use complaints::*;
pub use dashboards::*;
pub use extract::ApiJson;
pub use form::*;
pub use session::*;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Routes served under `/api`
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let signed_in = Router::new()
        // Session
        .route("/session/me", get(get_current_user))
        // Citizen dashboard
        .route("/citizen/dashboard", get(citizen_dashboard))
        .route("/citizen/tab", put(select_citizen_tab))
        .route("/citizen/filters", put(set_citizen_filters))
        // Staff dashboard
        .route("/staff/dashboard", get(staff_dashboard))
        .route("/staff/view", put(select_staff_view))
        // Admin dashboard
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/filters", put(set_admin_filters))
        .route(
            "/admin/category-filter/:category",
            post(toggle_category_filter),
        )
        // Complaint form
        .route("/form", post(open_form).delete(close_form))
        .route("/form/category", put(select_category))
        .route("/form/urgency", put(select_urgency))
        .route("/form/emergency", post(toggle_emergency))
        .route("/form/description", post(describe))
        // Complaints
        .route("/complaints", post(submit_complaint))
        .route("/complaints/:id", get(get_complaint))
        .route("/complaints/:id/status", put(update_complaint_status))
        .route("/complaints/:id/updates", post(post_update))
        .route("/complaints/:id/notes", post(post_note))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_user));

    Router::new()
        .route("/health", get(health))
        .route("/departments", get(list_departments))
        .route("/predict", post(predict))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        .merge(signed_in)
}

/// The API with state applied, without static files or CORS
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(&state))
        .layer(from_fn_with_state(state.clone(), middleware::security_headers))
        .with_state(state)
}
