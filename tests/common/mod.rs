//! In-process fake of the platform API used by the integration tests.
//!
//! Serves JSON shaped like the real server (naive timestamps, `detail` error
//! bodies) on an ephemeral port and records every request URI.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use challenge_hub::core::traits::PlatformApi;
use challenge_hub::{ApiConfig, HttpPlatformApi};
use di::Ref;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const CURRENT_USER: &str = "newbie_quantum";
pub const SEED_TIMESTAMP: &str = "2025-03-01T10:00:00";

#[derive(Default)]
pub struct FakePlatform {
    pub challenges: Vec<Value>,
    pub conversations: Vec<Value>,
    pub next_id: i64,
    /// Request URIs (path and query) in arrival order.
    pub requests: Vec<String>,
    /// When set, `GET /user` answers with this status and raw body.
    pub user_failure: Option<(StatusCode, String)>,
    /// When set, `POST /conversations/{id}/posts` answers with this status and raw body.
    pub post_failure: Option<(StatusCode, String)>,
    /// When set, `POST /conversations` answers with this status and raw body.
    pub create_failure: Option<(StatusCode, String)>,
}

pub type Shared = Arc<Mutex<FakePlatform>>;

pub fn challenge(id: i64) -> Value {
    let difficulty = ["Beginner", "Intermediate", "Advanced"][(id % 3) as usize];
    json!({
        "id": id,
        "challenge_id": format!("challenge-{id}"),
        "title": format!("Challenge {id}"),
        "description": format!("Solve problem number {id}"),
        "category": if id % 2 == 0 { "Circuits" } else { "Optimization" },
        "difficulty": difficulty,
        "points": id * 10,
        "tags": ["pennylane"],
        "learning_objectives": ["Build a circuit"],
        "hints": ["Read the docs"],
        "created_at": SEED_TIMESTAMP,
        "updated_at": SEED_TIMESTAMP,
    })
}

pub fn post(id: i64, conversation_id: i64, user: &str, content: &str) -> Value {
    json!({
        "id": id,
        "user": user,
        "content": content,
        "conversation_id": conversation_id,
        "timestamp": SEED_TIMESTAMP,
    })
}

pub fn conversation(id: i64, challenge_id: i64, user: &str, topic: &str, category: &str) -> Value {
    json!({
        "id": id,
        "identifier": format!("conv-{id}"),
        "challenge_id": challenge_id,
        "topic": topic,
        "category": category,
        "status": "OPEN",
        "assignee": null,
        "user": user,
        "posts": [],
        "created_at": SEED_TIMESTAMP,
        "updated_at": SEED_TIMESTAMP,
    })
}

impl FakePlatform {
    /// 25 challenges and three conversations, two of them on `challenge-1`.
    pub fn seeded() -> FakePlatform {
        let challenges = (1..=25).map(challenge).collect();

        let mut first = conversation(1, 1, CURRENT_USER, "Stuck on challenge 1", "Optimization");
        first["posts"] = json!([
            post(1, 1, CURRENT_USER, "How do I start?"),
            post(2, 1, "pennylane_support", "Try a Hadamard first"),
        ]);
        let second = conversation(2, 1, "someone_else", "Gradient question", "Optimization");
        let third = conversation(3, 2, CURRENT_USER, "Noise models", "Circuits");

        FakePlatform {
            challenges,
            conversations: vec![first, second, third],
            next_id: 100,
            ..Default::default()
        }
    }
}

fn page_of(items: Vec<Value>, params: &HashMap<String, String>) -> Value {
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let total = items.len();
    let page: Vec<Value> = items.into_iter().skip(offset).take(limit).collect();

    json!({"items": page, "total": total, "offset": offset, "limit": limit})
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": format!("{what} not found")})),
    )
        .into_response()
}

fn matches_param(item: &Value, field: &str, params: &HashMap<String, String>) -> bool {
    params
        .get(field)
        .is_none_or(|wanted| item[field].as_str() == Some(wanted.as_str()))
}

async fn list_challenges(
    State(state): State<Shared>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    let matching: Vec<Value> = platform
        .challenges
        .iter()
        .filter(|c| matches_param(c, "difficulty", &params) && matches_param(c, "category", &params))
        .cloned()
        .collect();

    Json(page_of(matching, &params)).into_response()
}

fn find_challenge(platform: &FakePlatform, slug: &str) -> Option<Value> {
    platform
        .challenges
        .iter()
        .find(|c| c["challenge_id"].as_str() == Some(slug))
        .cloned()
}

async fn read_challenge(State(state): State<Shared>, uri: Uri, Path(slug): Path<String>) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    match find_challenge(&platform, &slug) {
        Some(challenge) => Json(challenge).into_response(),
        None => not_found("Challenge"),
    }
}

async fn challenge_conversations(
    State(state): State<Shared>,
    uri: Uri,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    let Some(challenge) = find_challenge(&platform, &slug) else {
        return not_found("Challenge");
    };
    let mut items: Vec<Value> = platform
        .conversations
        .iter()
        .filter(|c| c["challenge_id"] == challenge["id"])
        .cloned()
        .collect();
    items.reverse();

    Json(page_of(items, &params)).into_response()
}

async fn list_conversations(
    State(state): State<Shared>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    let challenge_pk = params
        .get("challenge_id")
        .map(|slug| find_challenge(&platform, slug).map(|c| c["id"].clone()));

    let items: Vec<Value> = platform
        .conversations
        .iter()
        .filter(|c| matches_param(c, "status", &params) && matches_param(c, "category", &params))
        .filter(|c| match &challenge_pk {
            Some(Some(pk)) => c["challenge_id"] == *pk,
            Some(None) => false,
            None => true,
        })
        .cloned()
        .collect();

    Json(page_of(items, &params)).into_response()
}

async fn user_conversations(
    State(state): State<Shared>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    let items: Vec<Value> = platform
        .conversations
        .iter()
        .filter(|c| c["user"] == CURRENT_USER)
        .cloned()
        .collect();

    Json(page_of(items, &params)).into_response()
}

async fn create_conversation(
    State(state): State<Shared>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    if let Some((status, body)) = platform.create_failure.clone() {
        return (status, body).into_response();
    }

    let (Some(topic), Some(category)) = (body["topic"].as_str(), body["category"].as_str()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "topic"], "msg": "field required"}]})),
        )
            .into_response();
    };

    platform.next_id += 1;
    let id = platform.next_id;
    let mut created = conversation(id, body["challenge_id"].as_i64().unwrap_or(0), CURRENT_USER, topic, category);
    created["challenge_id"] = body["challenge_id"].clone();

    if let Some(initial) = body.get("initial_post").filter(|v| !v.is_null()) {
        platform.next_id += 1;
        let post_id = platform.next_id;
        created["posts"] = json!([post(
            post_id,
            id,
            initial["user"].as_str().unwrap_or(CURRENT_USER),
            initial["content"].as_str().unwrap_or_default(),
        )]);
    }

    platform.conversations.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn read_conversation(State(state): State<Shared>, uri: Uri, Path(id): Path<i64>) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    match platform.conversations.iter().find(|c| c["id"] == id) {
        Some(conversation) => Json(conversation.clone()).into_response(),
        None => not_found("Conversation"),
    }
}

async fn list_posts(
    State(state): State<Shared>,
    uri: Uri,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    match platform.conversations.iter().find(|c| c["id"] == id) {
        Some(conversation) => {
            let posts = conversation["posts"].as_array().cloned().unwrap_or_default();
            Json(page_of(posts, &params)).into_response()
        }
        None => not_found("Conversation"),
    }
}

async fn create_post(
    State(state): State<Shared>,
    uri: Uri,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    if let Some((status, body)) = platform.post_failure.clone() {
        return (status, body).into_response();
    }

    platform.next_id += 1;
    let post_id = platform.next_id;
    let Some(conversation) = platform.conversations.iter_mut().find(|c| c["id"] == id) else {
        return not_found("Conversation");
    };

    let created = post(post_id, id, CURRENT_USER, body["content"].as_str().unwrap_or_default());
    if let Some(posts) = conversation["posts"].as_array_mut() {
        posts.push(created.clone());
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn current_user(State(state): State<Shared>, uri: Uri) -> Response {
    let mut platform = state.lock().unwrap();
    platform.requests.push(uri.to_string());

    if let Some((status, body)) = platform.user_failure.clone() {
        return (status, body).into_response();
    }

    Json(json!({
        "user_id": 1,
        "username": CURRENT_USER,
        "email": "newbie_quantum@example.com",
        "role": "user",
    }))
    .into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/challenges", get(list_challenges))
        .route("/challenges/:id", get(read_challenge))
        .route("/challenges/:id/conversations", get(challenge_conversations))
        .route("/conversations", get(list_conversations).post(create_conversation))
        .route("/conversations/user", get(user_conversations))
        .route("/conversations/:id", get(read_conversation))
        .route("/conversations/:id/posts", get(list_posts).post(create_post))
        .route("/user", get(current_user))
        .with_state(state)
}

/// Starts the fake on `127.0.0.1:0` and returns its base URL.
pub async fn spawn(platform: FakePlatform) -> (String, Shared) {
    let state = Arc::new(Mutex::new(platform));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    (format!("http://{addr}"), state)
}

pub fn client(base_url: &str) -> HttpPlatformApi {
    HttpPlatformApi::new(ApiConfig::new(base_url)).expect("build client")
}

pub fn shared_client(base_url: &str) -> Ref<dyn PlatformApi> {
    Ref::new(client(base_url))
}

pub fn requests(state: &Shared) -> Vec<String> {
    state.lock().unwrap().requests.clone()
}

/// Server-side conversations whose topic is exactly `topic`.
pub fn conversations_titled(state: &Shared, topic: &str) -> usize {
    state
        .lock()
        .unwrap()
        .conversations
        .iter()
        .filter(|c| c["topic"] == topic)
        .count()
}
