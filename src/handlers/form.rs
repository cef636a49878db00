//! Complaint form handlers: draft lifecycle and description classification

use crate::classifier::{self, Suggestion};
use crate::lexicon::{self, Department};
use crate::models::*;
use crate::session::ComplaintDraft;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiJson, AppState};

#[derive(Debug, Deserialize)]
pub struct DraftRef {
    pub draft_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub draft_id: Uuid,
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct SelectUrgencyRequest {
    pub draft_id: Uuid,
    pub urgency: Urgency,
}

#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub draft: ComplaintDraft,
    /// What the classifier suggested, if the description was long enough
    pub suggestion: Option<Suggestion>,
    /// Whether the suggestion filled in anything
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct DepartmentEntry {
    pub category: Category,
    pub department: &'static Department,
}

fn stale<T>() -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::error(
            "The complaint form is no longer open. Please start again.",
        )),
    )
}

// =============================================================================
// Draft lifecycle
// =============================================================================

/// Open the complaint form with an empty draft
pub async fn open_form(State(state): State<AppState>) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    let draft = desk.session.open_draft().clone();
    tracing::debug!("Opened complaint draft {}", draft.id);
    (StatusCode::CREATED, Json(ApiResponse::success(draft)))
}

/// Close the form. Classifier results still in flight are dropped on arrival.
pub async fn close_form(State(state): State<AppState>) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    desk.session.close_draft();
    (StatusCode::OK, Json(ApiResponse::<()>::empty()))
}

pub async fn select_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SelectCategoryRequest>,
) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    match desk.session.draft_mut(input.draft_id) {
        Some(draft) => {
            draft.select_category(input.category);
            (StatusCode::OK, Json(ApiResponse::success(draft.clone())))
        }
        None => stale(),
    }
}

pub async fn select_urgency(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SelectUrgencyRequest>,
) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    match desk.session.draft_mut(input.draft_id) {
        Some(draft) => {
            draft.select_urgency(input.urgency);
            (StatusCode::OK, Json(ApiResponse::success(draft.clone())))
        }
        None => stale(),
    }
}

pub async fn toggle_emergency(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DraftRef>,
) -> impl IntoResponse {
    let mut desk = state.desk.write().await;
    match desk.session.draft_mut(input.draft_id) {
        Some(draft) => {
            draft.toggle_emergency();
            (StatusCode::OK, Json(ApiResponse::success(draft.clone())))
        }
        None => stale(),
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Classify the description typed so far and fill the draft's empty fields.
///
/// The desk lock is released while the external classifier is consulted, so
/// the form stays usable. The result is applied only if the same draft is
/// still open when it arrives.
pub async fn describe(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DescribeRequest>,
) -> impl IntoResponse {
    let mut suggestion = {
        let desk = state.desk.read().await;
        let Some(draft) = desk.session.draft().filter(|d| d.id == input.draft_id) else {
            return stale();
        };
        match classifier::suggest(&input.description) {
            Some(suggestion) => suggestion,
            None => {
                let response = DescribeResponse {
                    draft: draft.clone(),
                    suggestion: None,
                    changed: false,
                };
                return (StatusCode::OK, Json(ApiResponse::success(response)));
            }
        }
    };

    if let Some(external) = &state.classifier {
        if let Some(category) = external.classify(&input.description).await {
            suggestion.category = Some(category);
        }
    }

    if suggestion.is_empty() {
        tracing::debug!("No keywords matched for draft {}", input.draft_id);
    }

    let mut desk = state.desk.write().await;
    let Some(draft) = desk.session.draft_mut(input.draft_id) else {
        tracing::debug!("Discarding classification for stale draft {}", input.draft_id);
        return stale();
    };
    let changed = draft.apply(&suggestion);
    let response = DescribeResponse {
        draft: draft.clone(),
        suggestion: Some(suggestion),
        changed,
    };
    (StatusCode::OK, Json(ApiResponse::success(response)))
}

/// Keyword category prediction, answering the same contract the external
/// classifier speaks
pub async fn predict(ApiJson(input): ApiJson<PredictRequest>) -> impl IntoResponse {
    let category = classifier::infer_category(&input.text).map(|c| c.as_str().to_string());
    Json(PredictResponse { category })
}

pub async fn list_departments() -> impl IntoResponse {
    let departments: Vec<DepartmentEntry> = lexicon::departments()
        .map(|(category, department)| DepartmentEntry {
            category,
            department,
        })
        .collect();
    Json(ApiResponse::success(departments))
}
