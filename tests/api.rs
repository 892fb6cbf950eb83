use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use dxtrainer_backend::config::TrainerConfig;
use dxtrainer_backend::routes::build_router;
use dxtrainer_backend::state::AppState;
use dxtrainer_backend::store::{study_session_key, FileStore, KeyValueStore, MemoryStore, CURRENCY_KEY};

fn app_with(store: Arc<dyn KeyValueStore>) -> Router {
    build_router(Arc::new(AppState::with_parts(TrainerConfig::default(), store)))
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn long_explanation(core: &str) -> String {
    let mut s = core.to_string();
    while s.chars().count() < 200 {
        s.push_str(" I will review adherence and repeat labs at the next visit.");
    }
    s
}

#[tokio::test]
async fn health_and_case_listing() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = call(&app, Method::GET, "/api/v1/cases", None).await;
    assert_eq!(status, StatusCode::OK);
    let cases = body.as_array().unwrap();
    assert_eq!(cases.len(), 10);
    assert_eq!(cases[0]["id"], 1);
    assert!(cases[0].get("correctOptionId").is_none());
}

#[tokio::test]
async fn shuffle_is_stable_per_mode() {
    let app = app();
    let (_, first) = call(&app, Method::GET, "/api/v1/cases/1/shuffle?mode=study", None).await;
    let (_, again) = call(&app, Method::GET, "/api/v1/cases/1/shuffle?mode=study", None).await;
    assert_eq!(first, again);

    let labels: Vec<&str> = first["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["displayLabel"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C", "D", "E"]);

    let correct = first["options"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["originalId"] == "A")
        .unwrap();
    assert_eq!(correct["displayLabel"], first["correctDisplayLabel"]);

    let (status, body) = call(&app, Method::GET, "/api/v1/cases/77/shuffle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown case: 77");
}

#[tokio::test]
async fn stateless_evaluation_and_scoring() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/reasoning/evaluate",
        Some(json!({ "caseId": 1, "text": "Heart failure with reduced EF: an SGLT2 inhibitor gives cardiovascular benefit." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 3);
    assert_eq!(body["lowQuality"], false);
    assert_eq!(body["hits"].as_array().unwrap().len(), 3);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/scoring/study",
        Some(json!({ "currency": 10, "correct": false, "hitCount": 0 })),
    )
    .await;
    assert_eq!(body, json!({ "delta": -5, "deltaText": "-5", "currency": 5 }));

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/scoring/versus",
        Some(json!({ "confidence": "low", "correct": false })),
    )
    .await;
    assert_eq!(body, json!({ "delta": 0, "deltaText": "0" }));
}

#[tokio::test]
async fn study_round_trip_persists_currency() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let app = app_with(Arc::new(FileStore::open(&path)));

    let (status, view) = call(&app, Method::POST, "/api/v1/study", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["currency"], 50);
    assert_eq!(view["phase"], "unanswered");
    assert_eq!(view["roundActive"], false);
    let id = view["id"].as_str().unwrap().to_string();

    let (status, view) = call(&app, Method::POST, &format!("/api/v1/study/{id}/select"), Some(json!({ "optionId": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "selected");
    assert_eq!(view["roundActive"], true);

    let (status, body) = call(&app, Method::POST, &format!("/api/v1/study/{id}/lock"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "explanation needs at least 200 characters (got 0)");

    let text = long_explanation("Heart failure makes empagliflozin, an SGLT2 inhibitor, the cardiovascular priority.");
    let (_, view) = call(&app, Method::POST, &format!("/api/v1/study/{id}/explain"), Some(json!({ "text": text }))).await;
    assert_eq!(view["phase"], "explaining");

    let (status, view) = call(&app, Method::POST, &format!("/api/v1/study/{id}/lock"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "locked");
    assert_eq!(view["currency"], 54);
    assert_eq!(view["deltaText"], "+4");
    assert_eq!(view["lastOutcome"]["isCorrect"], true);

    let (status, _) = call(&app, Method::POST, &format!("/api/v1/study/{id}/select"), Some(json!({ "optionId": "B" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, breakdown) = call(&app, Method::GET, &format!("/api/v1/study/{id}/breakdown"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(breakdown["correctOption"]["label"], "Empagliflozin");
    assert!(breakdown["suboptimalRationale"].is_null());

    let (_, view) = call(&app, Method::POST, &format!("/api/v1/study/{id}/next"), None).await;
    assert_eq!(view["caseIndex"], 1);
    assert_eq!(view["phase"], "unanswered");

    assert_eq!(FileStore::open(&path).get(CURRENCY_KEY).as_deref(), Some("54"));
}

#[tokio::test]
async fn study_session_survives_router_rebuild() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let first = app_with(store.clone());
    let (_, view) = call(&first, Method::POST, "/api/v1/study", None).await;
    let id = view["id"].as_str().unwrap().to_string();
    call(&first, Method::POST, &format!("/api/v1/study/{id}/select"), Some(json!({ "optionId": "C" }))).await;

    let second = app_with(store);
    let (status, view) = call(&second, Method::GET, &format!("/api/v1/study/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selectedId"], "C");

    let (status, _) = call(&second, Method::GET, "/api/v1/study/00000000-0000-0000-0000-000000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn versus_wager_flow() {
    let app = app();
    let (status, body) = call(&app, Method::PUT, "/api/v1/versus/players/a/name", Some(json!({ "name": "Ana" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "slot": "a", "name": "Ana" }));

    let (_, view) = call(&app, Method::POST, "/api/v1/versus", None).await;
    assert_eq!(view["phase"], "ready");
    assert_eq!(view["players"][0]["name"], "Ana");
    assert!(view["case"].is_null());
    let id = view["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/confirm"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/start"), None).await;
    assert_eq!(view["phase"], "playing");
    assert_eq!(view["roundActive"], true);
    assert_eq!(view["timeLeft"], 60);
    assert_eq!(view["case"]["id"], 1);

    let (status, body) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/select"), Some(json!({ "optionId": "B" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "declare a confidence level first");

    call(&app, Method::POST, &format!("/api/v1/versus/{id}/confidence"), Some(json!({ "confidence": "high" }))).await;
    call(&app, Method::POST, &format!("/api/v1/versus/{id}/select"), Some(json!({ "optionId": "A" }))).await;
    let (_, view) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/confirm"), None).await;
    assert_eq!(view["revealed"], true);
    assert_eq!(view["roundResult"]["delta"], 2);
    assert_eq!(view["players"][0]["score"], 2);
    assert!(view["correctDisplayLabel"].is_string());

    let (status, _) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/confidence"), Some(json!({ "confidence": "low" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/next"), None).await;
    assert_eq!(view["case"]["id"], 2);
    assert!(view["confidence"].is_null());

    let (status, _) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/player-b"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = call(&app, Method::POST, &format!("/api/v1/versus/{id}/restart"), None).await;
    assert_eq!(view["phase"], "ready");
    assert_eq!(view["players"][0]["score"], 0);
}

#[tokio::test]
async fn unknown_player_slot_is_rejected() {
    let (status, body) = call(&app(), Method::PUT, "/api/v1/versus/players/c/name", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown player slot: c");
}

#[tokio::test]
async fn theme_setting_round_trip() {
    let app = app();
    let (_, body) = call(&app, Method::GET, "/api/v1/settings/theme", None).await;
    assert_eq!(body, json!({ "theme": "dark" }));

    call(&app, Method::PUT, "/api/v1/settings/theme", Some(json!({ "theme": "light" }))).await;
    let (_, body) = call(&app, Method::GET, "/api/v1/settings/theme", None).await;
    assert_eq!(body, json!({ "theme": "light" }));

    let (_, body) = call(&app, Method::PUT, "/api/v1/settings/theme", Some(json!({ "theme": "sepia" }))).await;
    assert_eq!(body, json!({ "theme": "dark" }));
}

#[tokio::test]
async fn leaving_study_removes_the_session_and_its_snapshot() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());
    let (_, created) = call(&app, Method::POST, "/api/v1/study", None).await;
    let id = created["id"].as_str().unwrap().to_string();
    let key = study_session_key(&id.parse::<uuid::Uuid>().unwrap());
    assert!(store.get(&key).is_some());

    let uri = format!("/api/v1/study/{id}");
    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert!(store.get(&key).is_none());

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leaving_versus_removes_the_session() {
    let app = app();
    let (_, created) = call(&app, Method::POST, "/api/v1/versus", None).await;
    let uri = format!("/api/v1/versus/{}", created["id"].as_str().unwrap());
    let (status, _) = call(&app, Method::POST, &format!("{uri}/start"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
