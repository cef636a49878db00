//! Complaint handlers: filing, detail view and staff actions

use crate::classifier::ExternalClassifier;
use crate::lexicon;
use crate::models::*;
use crate::query::age_label;
use crate::state::Desk;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ApiJson;

const EXCERPT_LEN: usize = 110;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<RwLock<Desk>>,
    /// Remote category classifier, if one is configured
    pub classifier: Option<ExternalClassifier>,
    pub is_production: bool,
}

impl AppState {
    pub fn new(desk: Desk, classifier: Option<ExternalClassifier>, is_production: bool) -> Self {
        Self {
            desk: Arc::new(RwLock::new(desk)),
            classifier,
            is_production,
        }
    }
}

// =============================================================================
// Response builders
// =============================================================================

pub fn complaint_card(c: &Complaint, now: DateTime<Utc>) -> ComplaintCard {
    let excerpt = if c.description.chars().count() > EXCERPT_LEN {
        let cut: String = c.description.chars().take(EXCERPT_LEN).collect();
        format!("{}…", cut.trim_end())
    } else {
        c.description.clone()
    };

    ComplaintCard {
        id: c.id.clone(),
        title: c.title.clone(),
        excerpt,
        category: c.category,
        department: lexicon::department_named(&c.dept),
        urgency: c.urgency,
        status: c.status,
        address: c.address.clone(),
        age: age_label(c.timestamp, now),
        reports: c.reports,
        is_emergency: c.is_emergency,
        update_count: c.updates.len(),
        latest_update: c.updates.last().map(|u| u.text.clone()),
    }
}

pub fn complaint_detail(c: &Complaint, role: Role, now: DateTime<Utc>) -> ComplaintDetail {
    let can_edit = role.can_edit();
    ComplaintDetail {
        complaint: ComplaintSummary::from(c),
        department: lexicon::department_named(&c.dept),
        age: age_label(c.timestamp, now),
        can_edit,
        notes: can_edit.then(|| c.notes.clone()),
    }
}

fn forbidden<T>(message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::FORBIDDEN, Json(ApiResponse::error(message)))
}

fn not_editor<T>() -> (StatusCode, Json<ApiResponse<T>>) {
    forbidden("Only department staff and administrators can change complaints")
}

// =============================================================================
// Complaint Endpoints
// =============================================================================

/// File a complaint from the open form draft
pub async fn submit_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(input): ApiJson<SubmitComplaint>,
) -> impl IntoResponse {
    let mut desk = state.desk.write().await;

    let draft = match input
        .draft_id
        .and_then(|id| desk.session.draft_mut(id))
        .cloned()
    {
        Some(draft) => draft,
        None => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<ComplaintDetail>::error(
                    "The complaint form is no longer open. Please start again.",
                )),
            );
        }
    };

    let new = NewComplaint {
        title: input.title,
        description: input.description,
        category: draft.category,
        urgency: draft.urgency,
        address: input.address,
        citizen_name: input
            .citizen_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(user.name.clone())),
        citizen_email: input
            .citizen_email
            .filter(|e| !e.trim().is_empty())
            .or_else(|| Some(user.email.clone())),
        phone: input.phone,
        is_emergency: draft.is_emergency,
    };

    let detail = match desk.store.create(new) {
        Ok(complaint) => complaint_detail(complaint, user.role, Utc::now()),
        Err(e) => {
            tracing::debug!("Complaint rejected on field {:?}: {}", e.field(), e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(e.to_string())),
            );
        }
    };
    desk.session.take_draft(draft.id);

    (StatusCode::CREATED, Json(ApiResponse::success(detail)))
}

/// Open a complaint's detail view
pub async fn get_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut guard = state.desk.write().await;
    let desk = &mut *guard;

    match desk.store.get(&id) {
        Some(complaint) => {
            desk.session.open_complaint = Some(id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(complaint_detail(
                    complaint,
                    user.role,
                    Utc::now(),
                ))),
            )
        }
        None => {
            tracing::debug!("Detail for unknown complaint {} ignored", id);
            (StatusCode::OK, Json(ApiResponse::empty()))
        }
    }
}

/// Change a complaint's status (staff/admin)
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateStatusRequest>,
) -> impl IntoResponse {
    if !user.role.can_edit() {
        return not_editor();
    }

    let mut desk = state.desk.write().await;
    match desk.store.set_status(&id, input.status) {
        Some(previous) => {
            tracing::info!(
                "{} changed complaint {} status from {:?} to {:?}",
                user.name,
                id,
                previous,
                input.status
            );
            let detail = desk
                .store
                .get(&id)
                .map(|c| complaint_detail(c, user.role, Utc::now()));
            (StatusCode::OK, Json(ApiResponse { success: true, data: detail, error: None }))
        }
        None => {
            tracing::debug!("Status change for unknown complaint {} ignored", id);
            (StatusCode::OK, Json(ApiResponse::empty()))
        }
    }
}

/// Post a citizen-visible progress update (staff/admin)
pub async fn post_update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TextEntryRequest>,
) -> impl IntoResponse {
    if !user.role.can_edit() {
        return not_editor();
    }

    let author = user.update_author();
    let mut desk = state.desk.write().await;
    match desk.store.append_update(&id, &input.text, &author) {
        Ok(Some(complaint)) => {
            tracing::info!("{} posted an update on complaint {}", author, id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(complaint_detail(
                    complaint,
                    user.role,
                    Utc::now(),
                ))),
            )
        }
        Ok(None) => {
            tracing::debug!("Update for unknown complaint {} ignored", id);
            (StatusCode::OK, Json(ApiResponse::empty()))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// Attach an internal note (staff/admin)
pub async fn post_note(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TextEntryRequest>,
) -> impl IntoResponse {
    if !user.role.can_edit() {
        return not_editor();
    }

    let mut desk = state.desk.write().await;
    match desk.store.append_note(&id, &input.text) {
        Ok(Some(complaint)) => (
            StatusCode::OK,
            Json(ApiResponse::success(complaint_detail(
                complaint,
                user.role,
                Utc::now(),
            ))),
        ),
        Ok(None) => {
            tracing::debug!("Note for unknown complaint {} ignored", id);
            (StatusCode::OK, Json(ApiResponse::empty()))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}
