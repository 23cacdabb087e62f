//! Integration tests for chore-board API endpoints
//!
//! Each test runs the full router against an in-memory database with a
//! manually driven clock.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chore_board::{build_router, AppState};
use chore_common::db::{init_memory_database, seed_people, SqliteStore};
use chore_common::models::PersonSeed;
use chore_common::{Clock, ManualClock};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap()
}

/// Test helper: app over a fresh in-memory database with the default household
async fn setup_app() -> (Router, Arc<ManualClock>) {
    let pool = init_memory_database().await.expect("Should open memory database");
    let store = SqliteStore::new(pool);
    seed_people(&store, &PersonSeed::default_household())
        .await
        .expect("Should seed household");

    let clock = Arc::new(ManualClock::new(start()));
    let state = AppState::new(store, clock.clone() as Arc<dyn Clock>);
    (build_router(state), clock)
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: send a request, returning status and parsed JSON body
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

async fn person_id(app: &Router, name: &str) -> String {
    let (_, people) = send(app, request("GET", "/api/people")).await;
    people
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .map(|p| p["id"].as_str().unwrap().to_string())
        .unwrap()
}

async fn create_chore(app: &Router, title: &str, frequency: &str, subtasks: &[&str]) -> Value {
    let porter = person_id(app, "Porter").await;
    let body = json!({
        "title": title,
        "frequency": frequency,
        "assigneeIds": [porter],
        "subtasks": subtasks.iter().map(|t| json!({ "text": t })).collect::<Vec<_>>(),
    });
    let (status, chore) = send(app, json_request("POST", "/api/chores", body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", chore);
    chore
}

fn subtask_ids(chore: &Value) -> Vec<String> {
    chore["subtasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health and roster
// =============================================================================

#[tokio::test]
async fn test_health_reports_module() {
    let (app, _) = setup_app().await;
    let (status, body) = send(&app, request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "chore-board");
    assert!(body["gitHash"].is_string());
}

#[tokio::test]
async fn test_people_listed_by_name() {
    let (app, _) = setup_app().await;
    let (status, body) = send(&app, request("GET", "/api/people")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Brickley", "Porter"]);
}

// =============================================================================
// Chore editing
// =============================================================================

#[tokio::test]
async fn test_create_and_fetch_chore() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "  Dishes ", "DAILY", &["Wash", "", "Dry"]).await;

    assert_eq!(chore["title"], "Dishes");
    assert_eq!(chore["frequency"], "DAILY");
    assert!(chore["lastDoneAt"].is_null());
    let texts: Vec<&str> = chore["subtasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Wash", "Dry"]);

    let uri = format!("/api/chores/{}", chore["id"].as_str().unwrap());
    let (status, fetched) = send(&app, request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, chore);
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let (app, _) = setup_app().await;
    let body = json!({ "title": "   ", "frequency": "YEARLY", "subtasks": [{ "text": " " }] });
    let (status, error) = send(&app, json_request("POST", "/api/chores", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = error["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "frequency", "assigneeIds", "subtasks"]);

    let (_, chores) = send(&app, request("GET", "/api/chores")).await;
    assert!(chores.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_assignee_rejected() {
    let (app, _) = setup_app().await;
    let body = json!({
        "title": "Vacuum",
        "frequency": "WEEKLY",
        "assigneeIds": [uuid::Uuid::new_v4().to_string()],
        "subtasks": [{ "text": "Living room" }],
    });
    let (status, _) = send(&app, json_request("POST", "/api/chores", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let (app, _) = setup_app().await;

    let uri = format!("/api/chores/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("GET", "/api/chores/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_draft_applies_title_hints_and_splits_subtasks() {
    let (app, _) = setup_app().await;
    let body = json!({
        "title": "Mop floors - assigned to Porter",
        "frequency": "WEEKLY",
        "subtasksText": "Sweep\n\nMop; Dry",
    });
    let (status, chore) = send(&app, json_request("POST", "/api/chores/draft", body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chore["title"], "Mop floors");
    assert_eq!(chore["assignees"].as_array().unwrap().len(), 1);
    assert_eq!(chore["assignees"][0]["name"], "Porter");
    assert_eq!(chore["subtasks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_replaces_chore_and_resets_checklist() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "Laundry", "WEEKLY", &["Wash", "Fold"]).await;
    let id = chore["id"].as_str().unwrap();
    let first = &subtask_ids(&chore)[0];

    let (_, progress) = send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, first)),
    )
    .await;
    assert_eq!(progress["checkedCount"], 1);

    let brickley = person_id(&app, "Brickley").await;
    let body = json!({
        "title": "Laundry day",
        "frequency": "MONTHLY",
        "assigneeIds": [brickley],
        "subtasks": [{ "text": "Sort" }],
    });
    let (status, updated) =
        send(&app, json_request("PUT", &format!("/api/chores/{}", id), body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Laundry day");
    assert_eq!(updated["frequency"], "MONTHLY");
    assert_eq!(updated["assignees"][0]["name"], "Brickley");

    let (_, progress) = send(&app, request("GET", &format!("/api/chores/{}/checklist", id))).await;
    assert_eq!(progress["checkedCount"], 0);
    assert_eq!(progress["total"], 1);
    assert_eq!(progress["phase"], "IN_PROGRESS");
}

// =============================================================================
// Checklist and completion
// =============================================================================

#[tokio::test]
async fn test_complete_requires_every_subtask() {
    let (app, clock) = setup_app().await;
    let chore = create_chore(&app, "Bathroom", "WEEKLY", &["Sink", "Tub"]).await;
    let id = chore["id"].as_str().unwrap().to_string();
    let subtasks = subtask_ids(&chore);
    let complete_uri = format!("/api/chores/{}/complete", id);

    send(&app, request("POST", &format!("/api/chores/{}/checklist/{}", id, subtasks[0]))).await;
    let (status, result) = send(&app, request("POST", &complete_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["completed"], false);
    assert_eq!(result["checklist"]["checkedCount"], 1);

    let (_, progress) = send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, subtasks[1])),
    )
    .await;
    assert_eq!(progress["phase"], "READY");

    clock.advance(Duration::minutes(5));
    let porter = person_id(&app, "Porter").await;
    let (status, result) = send(
        &app,
        json_request("POST", &complete_uri, json!({ "completedByPersonId": porter })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["completed"], true);
    assert_eq!(result["checklist"]["checkedCount"], 0);

    let (_, fetched) = send(&app, request("GET", &format!("/api/chores/{}", id))).await;
    let last_done: DateTime<Utc> =
        serde_json::from_value(fetched["lastDoneAt"].clone()).unwrap();
    assert_eq!(last_done, clock.now());

    let (_, history) =
        send(&app, request("GET", &format!("/api/chores/{}/completions", id))).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["completedByPersonId"], porter);
}

#[tokio::test]
async fn test_toggle_twice_unchecks() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "Plants", "DAILY", &["Water"]).await;
    let uri = format!(
        "/api/chores/{}/checklist/{}",
        chore["id"].as_str().unwrap(),
        subtask_ids(&chore)[0]
    );

    let (_, progress) = send(&app, request("POST", &uri)).await;
    assert_eq!(progress["checkedCount"], 1);
    let (_, progress) = send(&app, request("POST", &uri)).await;
    assert_eq!(progress["checkedCount"], 0);
}

#[tokio::test]
async fn test_toggle_foreign_subtask_is_not_found() {
    let (app, _) = setup_app().await;
    let a = create_chore(&app, "Trash", "WEEKLY", &["Bins"]).await;
    let b = create_chore(&app, "Recycling", "WEEKLY", &["Sort"]).await;

    let uri = format!(
        "/api/chores/{}/checklist/{}",
        a["id"].as_str().unwrap(),
        subtask_ids(&b)[0]
    );
    let (status, _) = send(&app, request("POST", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_by_unknown_person_is_not_found() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "Dust", "MONTHLY", &["Shelves"]).await;
    let id = chore["id"].as_str().unwrap();
    send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, subtask_ids(&chore)[0])),
    )
    .await;

    let body = json!({ "completedByPersonId": uuid::Uuid::new_v4() });
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/chores/{}/complete", id), body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, fetched) = send(&app, request("GET", &format!("/api/chores/{}", id))).await;
    assert!(fetched["lastDoneAt"].is_null());
}

#[tokio::test]
async fn test_complete_rejects_malformed_person_id() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "Oven", "MONTHLY", &["Racks"]).await;
    let id = chore["id"].as_str().unwrap();
    send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, subtask_ids(&chore)[0])),
    )
    .await;
    let complete_uri = format!("/api/chores/{}/complete", id);

    let (status, body) = send(
        &app,
        json_request("POST", &complete_uri, json!({ "completedByPersonId": "porter" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("completion request"));

    let (status, _) = send(&app, json_request("POST", &complete_uri, json!("not an object"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = send(&app, request("GET", &format!("/api/chores/{}", id))).await;
    assert!(fetched["lastDoneAt"].is_null());
    let (_, history) =
        send(&app, request("GET", &format!("/api/chores/{}/completions", id))).await;
    assert!(history.as_array().unwrap().is_empty());

    // Checklist is untouched, so a bodyless finish still goes through
    let (status, result) = send(&app, request("POST", &complete_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["completed"], true);
}

#[tokio::test]
async fn test_delete_keeps_completion_history() {
    let (app, _) = setup_app().await;
    let chore = create_chore(&app, "Fridge", "MONTHLY", &["Wipe"]).await;
    let id = chore["id"].as_str().unwrap();
    send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, subtask_ids(&chore)[0])),
    )
    .await;
    send(&app, request("POST", &format!("/api/chores/{}/complete", id))).await;

    let (status, _) = send(&app, request("DELETE", &format!("/api/chores/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, request("GET", &format!("/api/chores/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", &format!("/api/chores/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) =
        send(&app, request("GET", &format!("/api/chores/{}/completions", id))).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

// =============================================================================
// Board
// =============================================================================

#[tokio::test]
async fn test_board_filters_and_score() {
    let (app, clock) = setup_app().await;
    let done = create_chore(&app, "Bed", "DAILY", &["Sheets"]).await;
    create_chore(&app, "Windows", "MONTHLY", &["Glass"]).await;
    create_chore(&app, "apples", "WEEKLY", &["Buy"]).await;

    let id = done["id"].as_str().unwrap();
    send(
        &app,
        request("POST", &format!("/api/chores/{}/checklist/{}", id, subtask_ids(&done)[0])),
    )
    .await;
    send(&app, request("POST", &format!("/api/chores/{}/complete", id))).await;

    // Never-done chores are overdue; the daily one was just done
    let (status, board) = send(&app, request("GET", "/api/board")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["filter"], "DUE");
    assert_eq!(board["count"], 2);
    let titles: Vec<&str> = board["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["chore"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["apples", "Windows"]);
    assert_eq!(board["rows"][0]["status"], "OVERDUE");
    // (1.0 + 0 + 0) / 3
    assert_eq!(board["cleanliness"], 33);

    let (_, fresh) = send(&app, request("GET", "/api/board?filter=fresh")).await;
    assert_eq!(fresh["count"], 1);
    assert_eq!(fresh["rows"][0]["chore"]["title"], "Bed");
    assert_eq!(fresh["rows"][0]["status"], "FRESH");

    let (_, all) = send(&app, request("GET", "/api/board?filter=ALL")).await;
    assert_eq!(all["count"], 3);

    // Exactly one period later the daily chore is due again
    clock.set(start() + Duration::days(1));
    let (_, board) = send(&app, request("GET", "/api/board")).await;
    assert_eq!(board["count"], 3);
    assert_eq!(board["rows"][2]["chore"]["title"], "Bed");
    assert_eq!(board["rows"][2]["status"], "DUE");
    assert_eq!(board["cleanliness"], 0);
}

#[tokio::test]
async fn test_board_rejects_unknown_filter() {
    let (app, _) = setup_app().await;
    let (status, body) = send(&app, request("GET", "/api/board?filter=soon")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("soon"));
}
