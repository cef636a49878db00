//! Role dashboards: citizen tabs, staff department views and the admin overview

use crate::models::*;
use crate::query::{self, CategoryStat, CitizenCounts, Listing, StaffCounts, StaffStats};
use crate::session::{AdminFilters, CitizenFilters, CitizenTab, StaffView};
use crate::state::Desk;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::complaints::complaint_card;
use super::{ApiJson, AppState};

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectTabRequest {
    pub tab: CitizenTab,
}

#[derive(Debug, Deserialize)]
pub struct SelectViewRequest {
    pub view: StaffView,
}

#[derive(Debug, Serialize)]
pub struct ComplaintList {
    pub total: usize,
    pub items: Vec<ComplaintCard>,
    /// Shown instead of the list when there is nothing to show
    pub empty_message: Option<&'static str>,
}

impl From<Listing<'_>> for ComplaintList {
    fn from(listing: Listing<'_>) -> Self {
        let now = Utc::now();
        Self {
            total: listing.len(),
            items: listing.items.iter().map(|c| complaint_card(c, now)).collect(),
            empty_message: listing.empty_message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CitizenDashboard {
    pub tab: CitizenTab,
    pub counts: CitizenCounts,
    pub filters: CitizenFilters,
    /// The community view offers no status, update or note actions
    pub read_only: bool,
    #[serde(flatten)]
    pub list: ComplaintList,
}

#[derive(Debug, Serialize)]
pub struct StaffDashboard {
    pub dept: String,
    pub view: StaffView,
    pub stats: StaffStats,
    pub counts: StaffCounts,
    #[serde(flatten)]
    pub list: ComplaintList,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub filters: AdminFilters,
    pub category_stats: Vec<CategoryStat>,
    #[serde(flatten)]
    pub list: ComplaintList,
}

fn citizen_dashboard_for(desk: &Desk, user: &User) -> CitizenDashboard {
    let session = &desk.session;
    let counts = query::citizen_tabs(&desk.store, user).counts();
    let listing = query::citizen_view(
        &desk.store,
        user,
        session.citizen_tab,
        &session.citizen_filters,
    );
    CitizenDashboard {
        tab: session.citizen_tab,
        counts,
        filters: session.citizen_filters.clone(),
        read_only: session.citizen_tab == CitizenTab::All,
        list: listing.into(),
    }
}

fn staff_dashboard_for(desk: &Desk, dept: &str) -> StaffDashboard {
    let view = desk.session.staff_view;
    StaffDashboard {
        dept: dept.to_string(),
        view,
        stats: query::staff_stats(&desk.store, dept),
        counts: query::staff_counts(&desk.store, dept),
        list: query::staff_view(&desk.store, dept, view).into(),
    }
}

fn admin_dashboard_for(desk: &Desk) -> AdminDashboard {
    let filters = &desk.session.admin_filters;
    AdminDashboard {
        filters: filters.clone(),
        category_stats: query::category_stats(&desk.store, filters.category),
        list: query::admin_view(&desk.store, filters).into(),
    }
}

fn wrong_role<T>(role: Role) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::error(format!(
            "This dashboard is not available to the {:?} role",
            role
        ))),
    )
}

// =============================================================================
// Citizen
// =============================================================================

pub async fn citizen_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    if user.role != Role::Citizen {
        return wrong_role(user.role);
    }
    let desk = state.desk.read().await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(citizen_dashboard_for(&desk, &user))),
    )
}

pub async fn select_citizen_tab(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(input): ApiJson<SelectTabRequest>,
) -> impl IntoResponse {
    if user.role != Role::Citizen {
        return wrong_role(user.role);
    }
    let mut desk = state.desk.write().await;
    desk.session.citizen_tab = input.tab;
    (
        StatusCode::OK,
        Json(ApiResponse::success(citizen_dashboard_for(&desk, &user))),
    )
}

pub async fn set_citizen_filters(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(filters): ApiJson<CitizenFilters>,
) -> impl IntoResponse {
    if user.role != Role::Citizen {
        return wrong_role(user.role);
    }
    let mut desk = state.desk.write().await;
    desk.session.citizen_filters = filters;
    (
        StatusCode::OK,
        Json(ApiResponse::success(citizen_dashboard_for(&desk, &user))),
    )
}

// =============================================================================
// Staff
// =============================================================================

pub async fn staff_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    let Some(dept) = user.dept.as_deref().filter(|_| user.role == Role::Staff) else {
        return wrong_role(user.role);
    };
    let desk = state.desk.read().await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(staff_dashboard_for(&desk, dept))),
    )
}

pub async fn select_staff_view(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(input): ApiJson<SelectViewRequest>,
) -> impl IntoResponse {
    let Some(dept) = user.dept.as_deref().filter(|_| user.role == Role::Staff) else {
        return wrong_role(user.role);
    };
    let mut desk = state.desk.write().await;
    desk.session.staff_view = input.view;
    (
        StatusCode::OK,
        Json(ApiResponse::success(staff_dashboard_for(&desk, dept))),
    )
}

// =============================================================================
// Admin
// =============================================================================

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    if user.role != Role::Admin {
        return wrong_role(user.role);
    }
    let desk = state.desk.read().await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(admin_dashboard_for(&desk))),
    )
}

pub async fn set_admin_filters(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(filters): ApiJson<AdminFilters>,
) -> impl IntoResponse {
    if user.role != Role::Admin {
        return wrong_role(user.role);
    }
    let mut desk = state.desk.write().await;
    desk.session.admin_filters = filters;
    (
        StatusCode::OK,
        Json(ApiResponse::success(admin_dashboard_for(&desk))),
    )
}

/// Category stat card click: select the category, or clear it if selected
pub async fn toggle_category_filter(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    if user.role != Role::Admin {
        return wrong_role(user.role);
    }
    let Some(category) = Category::parse(&category) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Unknown category: {}", category))),
        );
    };
    let mut desk = state.desk.write().await;
    desk.session.admin_filters.toggle_category(category);
    tracing::debug!(
        "Admin category filter now {:?}",
        desk.session.admin_filters.category
    );
    (
        StatusCode::OK,
        Json(ApiResponse::success(admin_dashboard_for(&desk))),
    )
}
