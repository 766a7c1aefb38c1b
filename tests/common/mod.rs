// In-process notes store for integration tests
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use axum_macros::debug_handler;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use notes_frontend::{models::Note, repository::HttpNotesApi};

#[derive(Default)]
pub struct Requests {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl Requests {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn create(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn update(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct Inner {
    notes: Vec<Note>,
    last_id: i64,
}

#[derive(Default)]
pub struct TestStore {
    inner: tokio::sync::Mutex<Inner>,
    omit_result: AtomicBool,
    pub requests: Requests,
}

impl TestStore {
    pub async fn seed(&self, notes: Vec<Note>) {
        let mut inner = self.inner.lock().await;
        inner.last_id = notes.iter().map(|note| note.id).max().unwrap_or(inner.last_id);
        inner.notes = notes;
    }

    pub async fn set_last_id(&self, id: i64) {
        self.inner.lock().await.last_id = id;
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.inner.lock().await.notes.clone()
    }

    /// Makes update and delete answer `{}` instead of `{"result": ...}`.
    pub fn omit_result(&self) {
        self.omit_result.store(true, Ordering::SeqCst);
    }

    fn result(&self, message: &str) -> Value {
        if self.omit_result.load(Ordering::SeqCst) {
            json!({})
        } else {
            json!({ "result": message })
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Note not found" }))).into_response()
}

fn fields(payload: &Value) -> Option<(String, String)> {
    let title = payload.get("title")?.as_str()?.to_string();
    let content = payload.get("content")?.as_str()?.to_string();
    Some((title, content))
}

#[debug_handler]
async fn list_notes(State(store): State<Arc<TestStore>>) -> Response {
    store.requests.list.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(store.notes().await)).into_response()
}

#[debug_handler]
async fn create_note(State(store): State<Arc<TestStore>>, Json(payload): Json<Value>) -> Response {
    store.requests.create.fetch_add(1, Ordering::SeqCst);
    let Some((title, content)) = fields(&payload) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Title and content required" })),
        )
            .into_response();
    };

    let mut inner = store.inner.lock().await;
    inner.last_id += 1;
    let note = Note {
        id: inner.last_id,
        title,
        content,
    };
    inner.notes.push(note.clone());
    (StatusCode::CREATED, Json(note)).into_response()
}

#[debug_handler]
async fn get_note(State(store): State<Arc<TestStore>>, Path(id): Path<i64>) -> Response {
    store.requests.get.fetch_add(1, Ordering::SeqCst);
    match store.notes().await.into_iter().find(|note| note.id == id) {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => not_found(),
    }
}

#[debug_handler]
async fn update_note(
    State(store): State<Arc<TestStore>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Response {
    store.requests.update.fetch_add(1, Ordering::SeqCst);
    let Some((title, content)) = fields(&payload) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Title and content required" })),
        )
            .into_response();
    };

    let mut inner = store.inner.lock().await;
    let Some(note) = inner.notes.iter_mut().find(|note| note.id == id) else {
        return not_found();
    };
    note.title = title;
    note.content = content;
    (StatusCode::OK, Json(store.result("Updated"))).into_response()
}

#[debug_handler]
async fn delete_note(State(store): State<Arc<TestStore>>, Path(id): Path<i64>) -> Response {
    store.requests.delete.fetch_add(1, Ordering::SeqCst);
    store.inner.lock().await.notes.retain(|note| note.id != id);
    (StatusCode::OK, Json(store.result("Deleted if existed"))).into_response()
}

pub const UNAVAILABLE_BODY: &str = "notes store is down for maintenance";

// Answers every method with a plain-text 503, like a proxy in front of a dead store
async fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY).into_response()
}

/// Collection URL on the same server whose every route answers 503 with a text body.
pub fn unavailable_url(url: &str) -> String {
    url.replace("/notes", "/unavailable/notes")
}

/// Starts a store on an ephemeral port and returns it with the notes collection URL.
pub async fn spawn_store() -> (Arc<TestStore>, String) {
    let store = Arc::new(TestStore::default());

    let router = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).put(update_note).delete(delete_note))
        .route("/unavailable/notes", any(unavailable))
        .route("/unavailable/notes/{id}", any(unavailable))
        .with_state(store.clone())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test store");
    let addr = listener.local_addr().expect("test store has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test store stopped");
    });

    (store, format!("http://{addr}/notes"))
}

/// URL of a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("probe listener has no address");
    drop(listener);
    format!("http://{addr}/notes")
}

pub fn client(url: &str) -> HttpNotesApi {
    HttpNotesApi::new(url, None).expect("failed to build client")
}

pub fn note(id: i64, title: &str, content: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: content.to_string(),
    }
}
