use super::*;
use crate::classifier::ExternalClassifier;
use crate::models::Status;
use crate::state::Desk;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn demo_app() -> (AppState, Router) {
    let state = AppState::new(Desk::with_demo_data(), None, false);
    (state.clone(), app(state))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, "/api/session/login", Some(body)).await
}

async fn login_citizen(app: &Router) {
    let (status, _) = login(
        app,
        json!({"name": "Priya Sharma", "email": "priya@example.com", "role": "citizen"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn login_staff(app: &Router, dept: &str) {
    let (status, _) = login(
        app,
        json!({"name": "Vikram", "email": "vikram@city.gov", "role": "staff", "dept": dept}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn login_admin(app: &Router) {
    let (status, _) = login(
        app,
        json!({"name": "Asha", "email": "asha@city.gov", "role": "admin"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

fn item_ids(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_signed_in_routes_require_session() {
    let (_, app) = demo_app();
    let (status, body) = call(&app, Method::GET, "/api/citizen/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["error"], "Not signed in");
}

#[tokio::test]
async fn test_login_validation() {
    let (_, app) = demo_app();
    let (status, body) = login(&app, json!({"name": " ", "email": "a@b.nl", "role": "citizen"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'name' is required");

    let (status, _) = login(&app, json!({"name": "Vikram", "email": "v@city.gov", "role": "staff"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_resets_view_state() {
    let (state, app) = demo_app();
    login_admin(&app).await;
    call(&app, Method::POST, "/api/admin/category-filter/Water", None).await;
    assert!(state.desk.read().await.session.admin_filters.category.is_some());

    let (status, _) = call(&app, Method::POST, "/api/session/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    let desk = state.desk.read().await;
    assert!(desk.session.user().is_none());
    assert!(desk.session.admin_filters.category.is_none());
}

#[tokio::test]
async fn test_citizen_dashboard_tabs() {
    let (_, app) = demo_app();
    login_citizen(&app).await;

    let (status, body) = call(&app, Method::GET, "/api/citizen/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tab"], "active");
    assert_eq!(body["data"]["counts"]["active"], 1);
    assert_eq!(item_ids(&body), vec!["CP-DEMO001"]);
    assert_eq!(body["data"]["read_only"], false);

    let (_, body) = call(&app, Method::PUT, "/api/citizen/tab", Some(json!({"tab": "history"}))).await;
    assert!(item_ids(&body).is_empty());
    assert_eq!(body["data"]["empty_message"], "Nothing here yet.");

    let (_, body) = call(&app, Method::PUT, "/api/citizen/tab", Some(json!({"tab": "all"}))).await;
    assert_eq!(body["data"]["read_only"], true);
    assert_eq!(
        item_ids(&body),
        vec!["CP-DEMO001", "CP-DEMO002", "CP-DEMO003", "CP-DEMO004"]
    );

    let filters = json!({"category": "All", "dept": "All", "status": "All", "urgency": "Medium", "search": "street"});
    let (status, body) = call(&app, Method::PUT, "/api/citizen/filters", Some(filters)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item_ids(&body), vec!["CP-DEMO003"]);
}

#[tokio::test]
async fn test_dashboards_are_role_specific() {
    let (_, app) = demo_app();
    login_citizen(&app).await;
    let (status, _) = call(&app, Method::GET, "/api/admin/dashboard", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::GET, "/api/staff/dashboard", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_dashboard_views() {
    let (_, app) = demo_app();
    login_staff(&app, "Water Authority").await;

    let (_, body) = call(&app, Method::GET, "/api/staff/dashboard", None).await;
    assert_eq!(item_ids(&body), vec!["CP-DEMO001"]);
    assert_eq!(body["data"]["stats"]["high_priority"], 1);
    assert_eq!(body["data"]["counts"]["other"], 3);

    let (_, body) = call(&app, Method::PUT, "/api/staff/view", Some(json!({"view": "other"}))).await;
    assert_eq!(
        item_ids(&body),
        vec!["CP-DEMO002", "CP-DEMO003", "CP-DEMO004"]
    );
}

#[tokio::test]
async fn test_admin_category_toggle() {
    let (_, app) = demo_app();
    login_admin(&app).await;

    let (_, body) = call(&app, Method::POST, "/api/admin/category-filter/Water", None).await;
    assert_eq!(body["data"]["filters"]["category"], "Water");
    assert_eq!(item_ids(&body), vec!["CP-DEMO001"]);
    let water = body["data"]["category_stats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["category"] == "Water")
        .unwrap()
        .clone();
    assert_eq!(water["active"], true);
    assert_eq!(water["high"], 1);

    let (_, body) = call(&app, Method::POST, "/api/admin/category-filter/Water", None).await;
    assert_eq!(body["data"]["filters"]["category"], Value::Null);
    assert_eq!(item_ids(&body).len(), 4);

    let (status, _) = call(&app, Method::POST, "/api/admin/category-filter/Parks", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_filters_empty_state() {
    let (_, app) = demo_app();
    login_admin(&app).await;
    let filters = json!({"category": "Safety", "urgency": "All", "search": ""});
    let (_, body) = call(&app, Method::PUT, "/api/admin/filters", Some(filters)).await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["empty_message"], "No complaints match the filters.");
}

#[tokio::test]
async fn test_file_complaint_through_form() {
    let (state, app) = demo_app();
    login_citizen(&app).await;

    let (status, body) = call(&app, Method::POST, "/api/form", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let draft_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/form/description",
        Some(json!({"draft_id": draft_id, "description": "Gas leak near the school gate"})),
    )
    .await;
    assert_eq!(body["data"]["changed"], true);
    assert_eq!(body["data"]["draft"]["category"], "Safety");
    assert_eq!(body["data"]["draft"]["urgency"], "High");
    assert_eq!(body["data"]["draft"]["is_emergency"], true);

    // Missing title is reported by name and files nothing
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/complaints",
        Some(json!({"draft_id": draft_id, "title": "", "description": "Gas leak", "address": "School Lane"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'title' is required");
    assert_eq!(state.desk.read().await.store.len(), 4);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/complaints",
        Some(json!({
            "draft_id": draft_id,
            "title": "Gas leak",
            "description": "Gas leak near the school gate",
            "address": "School Lane"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["dept"], "Police/Fire");
    assert_eq!(body["data"]["status"], "Received");
    assert_eq!(body["data"]["citizen_name"], "Priya Sharma");
    assert_eq!(body["data"]["is_emergency"], true);

    // The draft is consumed by a successful submission
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/complaints",
        Some(json!({"draft_id": draft_id, "title": "Again", "description": "Again", "address": "Here"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_manual_choice_survives_classification() {
    let (_, app) = demo_app();
    login_citizen(&app).await;
    let (_, body) = call(&app, Method::POST, "/api/form", None).await;
    let draft_id = body["data"]["id"].as_str().unwrap().to_string();

    call(
        &app,
        Method::PUT,
        "/api/form/category",
        Some(json!({"draft_id": draft_id, "category": "Infrastructure"})),
    )
    .await;
    let (_, body) = call(
        &app,
        Method::POST,
        "/api/form/description",
        Some(json!({"draft_id": draft_id, "description": "Water pipe burst on the road"})),
    )
    .await;
    assert_eq!(body["data"]["draft"]["category"], "Infrastructure");
    assert_eq!(body["data"]["suggestion"]["category"], "Water");
    assert_eq!(body["data"]["draft"]["urgency"], "High");
}

#[tokio::test]
async fn test_short_description_is_not_classified() {
    let (_, app) = demo_app();
    login_citizen(&app).await;
    let (_, body) = call(&app, Method::POST, "/api/form", None).await;
    let draft_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/form/description",
        Some(json!({"draft_id": draft_id, "description": "fire"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], false);
    assert_eq!(body["data"]["suggestion"], Value::Null);
}

#[tokio::test]
async fn test_late_classification_is_discarded() {
    // External classifier that answers slowly
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let slow = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!({"category": "Sanitation"}))
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, slow).await.unwrap();
    });

    let classifier =
        ExternalClassifier::new(format!("http://{}/predict", addr), Duration::from_secs(2)).unwrap();
    let state = AppState::new(Desk::with_demo_data(), Some(classifier), false);
    let app = app(state.clone());
    login_citizen(&app).await;

    let (_, body) = call(&app, Method::POST, "/api/form", None).await;
    let first = body["data"]["id"].as_str().unwrap().to_string();

    let pending = {
        let app = app.clone();
        let first = first.clone();
        tokio::spawn(async move {
            call(
                &app,
                Method::POST,
                "/api/form/description",
                Some(json!({"draft_id": first, "description": "Overflowing trash bins"})),
            )
            .await
        })
    };

    // Form is closed and reopened while the classifier is still thinking
    tokio::time::sleep(Duration::from_millis(50)).await;
    let (_, body) = call(&app, Method::POST, "/api/form", None).await;
    let second = body["data"]["id"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    let (status, _) = pending.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let desk = state.desk.read().await;
    let draft = desk.session.draft().unwrap();
    assert_eq!(draft.id.to_string(), second);
    assert_eq!(draft.category, None);
    assert_eq!(draft.urgency, None);
}

#[tokio::test]
async fn test_external_category_takes_precedence() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let remote = Router::new().route(
        "/predict",
        post(|| async { Json(json!({"category": "Sanitation"})) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, remote).await.unwrap();
    });

    let classifier =
        ExternalClassifier::new(format!("http://{}/predict", addr), Duration::from_secs(2)).unwrap();
    let app = app(AppState::new(Desk::with_demo_data(), Some(classifier), false));
    login_citizen(&app).await;
    let (_, body) = call(&app, Method::POST, "/api/form", None).await;
    let draft_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/form/description",
        Some(json!({"draft_id": draft_id, "description": "Water pooling by the drain"})),
    )
    .await;
    assert_eq!(body["data"]["draft"]["category"], "Sanitation");
}

#[tokio::test]
async fn test_citizen_cannot_mutate_and_sees_no_notes() {
    let (state, app) = demo_app();
    login_citizen(&app).await;

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/complaints/CP-DEMO002/status",
        Some(json!({"status": "Resolved"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/complaints/CP-DEMO002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("notes").is_none());
    assert_eq!(body["data"]["can_edit"], false);
    assert_eq!(
        state.desk.read().await.session.open_complaint.as_deref(),
        Some("CP-DEMO002")
    );
}

#[tokio::test]
async fn test_staff_updates_status_updates_and_notes() {
    let (state, app) = demo_app();
    login_staff(&app, "Health Dept").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/complaints/CP-DEMO004/status",
        Some(json!({"status": "In Progress"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Progress");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/complaints/CP-DEMO004/updates",
        Some(json!({"text": "Truck assigned"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updates"][0]["author"], "Health Dept");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/complaints/CP-DEMO004/notes",
        Some(json!({"text": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'note' is required");

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/complaints/CP-DEMO004/notes",
        Some(json!({"text": "Check again Friday"})),
    )
    .await;
    assert_eq!(body["data"]["notes"], json!(["Check again Friday"]));

    let desk = state.desk.read().await;
    assert_eq!(desk.store.get("CP-DEMO004").unwrap().notes.len(), 1);
}

#[tokio::test]
async fn test_unknown_complaint_mutation_is_silent() {
    let (_, app) = demo_app();
    login_admin(&app).await;
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/complaints/CP-MISSING/status",
        Some(json!({"status": "Resolved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], Value::Null);

    let (status, body) = call(&app, Method::GET, "/api/complaints/CP-MISSING", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_malformed_body_answers_with_envelope() {
    let (state, app) = demo_app();
    login_staff(&app, "Health Dept").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/complaints/CP-DEMO004/status",
        Some(json!({"status": "Closed"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert!(body["error"].as_str().unwrap().contains("Closed"));
    assert_eq!(
        state.desk.read().await.store.get("CP-DEMO004").unwrap().status,
        Status::Received
    );

    let filters = json!({"category": "Parks"});
    let (status, body) = call(&app, Method::PUT, "/api/admin/filters", Some(filters)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_without_role_is_rejected() {
    let (state, app) = demo_app();
    let (status, body) = login(&app, json!({"name": "Priya", "email": "priya@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(state.desk.read().await.session.user().is_none());
}

#[tokio::test]
async fn test_predict_contract() {
    let (_, app) = demo_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/predict",
        Some(json!({"text": "Streetlight flickering all night"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Electricity");

    let (_, body) = call(&app, Method::POST, "/api/predict", Some(json!({"text": "hello"}))).await;
    assert_eq!(body["category"], Value::Null);
}

#[tokio::test]
async fn test_departments_and_security_headers() {
    let (_, app) = demo_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/departments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["X-Frame-Options"], "DENY");
    assert!(response.headers()["Content-Security-Policy"]
        .to_str()
        .unwrap()
        .contains("frame-ancestors 'none'"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["department"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Public Works",
            "Health Dept",
            "Police/Fire",
            "Water Authority",
            "Power Dept"
        ]
    );
}
