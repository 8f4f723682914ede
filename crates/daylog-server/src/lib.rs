//! Local HTTP API for daylog.
//!
//! Wraps a single [`EditSession`] so an editor front end can push buffer
//! edits, toggle and migrate lines, move between days and run end-of-day
//! migration against a journal.

pub mod session;

pub use session::EditSession;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use daylog_core::{parse_log, CoreError, DayKey, DayStore, MigrationOutcome, ParsedEntry};
use daylog_fs::Journal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server state shared across handlers.
pub struct AppState<S> {
    store: Arc<S>,
    session: Mutex<EditSession<S>>,
}

impl<S> AppState<S>
where
    S: DayStore + Send + Sync + 'static,
{
    /// Create state around a store and an open session on it.
    #[must_use]
    pub fn new(store: Arc<S>, session: EditSession<S>) -> Self {
        Self {
            store,
            session: Mutex::new(session),
        }
    }
}

/// Build the API router.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: DayStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/session", get(get_session::<S>))
        .route("/session/text", put(edit_text::<S>))
        .route("/session/date", post(switch_date::<S>))
        .route("/session/flush", post(flush::<S>))
        .route("/session/lines/{index}/toggle", post(toggle_line::<S>))
        .route("/session/lines/{index}/migrate", post(migrate_line::<S>))
        .route("/session/migrate", post(migrate_all::<S>))
        .route("/days/{date}", get(get_day::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server on a journal, with today as the active date.
///
/// Pending edits are flushed on Ctrl+C.
///
/// # Errors
/// Returns error if the journal cannot be opened, binding fails, or the
/// server encounters an error.
pub async fn serve(journal_path: &std::path::Path, host: &str, port: u16) -> Result<()> {
    let journal = Arc::new(Journal::open(journal_path).context("Failed to open journal")?);
    let delay = journal.config().editor.debounce();
    let session = EditSession::open(Arc::clone(&journal), DayKey::today(), delay)?;
    let state = Arc::new(AppState::new(journal, session));

    let app = router(Arc::clone(&state));

    let addr = format!("{host}:{port}");
    info!(address = %addr, "Starting daylog server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.session.lock().await.flush()?;
    info!("Flushed session, server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
    }
}

// --- Request/Response types ---

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionView {
    date: DayKey,
    text: String,
    entries: Vec<ParsedEntry>,
    pending: bool,
}

impl SessionView {
    fn of<S>(session: &EditSession<S>) -> Self
    where
        S: DayStore + Send + Sync + 'static,
    {
        Self {
            date: session.date(),
            text: session.text().to_string(),
            entries: session.entries(),
            pending: session.has_pending_write(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DayView {
    date: DayKey,
    text: String,
    entries: Vec<ParsedEntry>,
}

#[derive(Debug, Deserialize)]
struct EditRequest {
    text: String,
}

/// Either an absolute date or a day offset from the active date.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DateTarget {
    Date { date: DayKey },
    Offset { offset: i64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct MigrateResponse {
    outcome: MigrationOutcome,
    session: SessionView,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Handlers ---

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_session<S>(State(state): State<Arc<AppState<S>>>) -> Json<SessionView>
where
    S: DayStore + Send + Sync + 'static,
{
    let session = state.session.lock().await;
    Json(SessionView::of(&session))
}

async fn edit_text<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<EditRequest>,
) -> Json<SessionView>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    session.edit(req.text);
    Json(SessionView::of(&session))
}

async fn switch_date<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(target): Json<DateTarget>,
) -> Result<Json<SessionView>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    let date = match target {
        DateTarget::Date { date } => date,
        DateTarget::Offset { offset } => session.date().offset(offset)?,
    };
    session.switch_date(date)?;
    Ok(Json(SessionView::of(&session)))
}

async fn flush<S>(State(state): State<Arc<AppState<S>>>) -> Result<Json<SessionView>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    session.flush()?;
    Ok(Json(SessionView::of(&session)))
}

async fn toggle_line<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    session.toggle_line(index)?;
    Ok(Json(SessionView::of(&session)))
}

async fn migrate_line<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    session.migrate_line(index)?;
    Ok(Json(SessionView::of(&session)))
}

async fn migrate_all<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<MigrateResponse>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let mut session = state.session.lock().await;
    let outcome = session.migrate_all_open()?;
    Ok(Json(MigrateResponse {
        outcome,
        session: SessionView::of(&session),
    }))
}

async fn get_day<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError>
where
    S: DayStore + Send + Sync + 'static,
{
    let date: DayKey = date.parse()?;
    let text = state.store.get(date)?;
    Ok(Json(DayView {
        date,
        entries: parse_log(&text),
        text,
    }))
}

// --- Error handling ---

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.downcast_ref::<CoreError>() {
            Some(CoreError::InvalidDate(_) | CoreError::LineOutOfRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use daylog_core::{EntryType, MemoryStore, TaskStatus};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn app(store: &Arc<MemoryStore>) -> Router {
        let session =
            EditSession::open(Arc::clone(store), day("2024-06-01"), Duration::from_millis(300))
                .unwrap();
        router(Arc::new(AppState::new(Arc::clone(store), session)))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let store = Arc::new(MemoryStore::new());
        let (status, body) = call(&app(&store), "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_edit_and_toggle() {
        let store = Arc::new(MemoryStore::new());
        let app = app(&store);

        let (status, body) = call(
            &app,
            "PUT",
            "/session/text",
            Some(json!({ "text": "- buy milk #home\no dinner" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pending"], true);
        assert_eq!(body["entries"][0]["tags"][0], "#home");

        let (status, body) = call(&app, "POST", "/session/lines/0/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "x buy milk #home\no dinner");

        let view: SessionView = serde_json::from_value(body).unwrap();
        assert_eq!(view.entries[0].entry_type, EntryType::Task);
        assert_eq!(view.entries[0].status, Some(TaskStatus::Done));
    }

    #[tokio::test]
    async fn test_line_out_of_range_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let (status, body) = call(&app(&store), "POST", "/session/lines/5/migrate", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn test_switch_date_by_offset_and_flush() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-05-31"), "o yesterday").unwrap();
        let app = app(&store);

        let (status, body) = call(&app, "POST", "/session/date", Some(json!({ "offset": -1 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-05-31");
        assert_eq!(body["text"], "o yesterday");

        call(&app, "PUT", "/session/text", Some(json!({ "text": "o moved" }))).await;
        let (status, body) = call(&app, "POST", "/session/flush", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pending"], false);
        assert_eq!(store.get(day("2024-05-31")).unwrap(), "o moved");
    }

    #[tokio::test]
    async fn test_bulk_migrate() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-06-01"), "- a\n- b\nx c").unwrap();
        let app = app(&store);

        let (status, body) = call(&app, "POST", "/session/migrate", None).await;
        assert_eq!(status, StatusCode::OK);

        let resp: MigrateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.outcome.updated_text, "> a\n> b\nx c");
        assert_eq!(resp.outcome.next_date, day("2024-06-02"));
        assert_eq!(resp.session.date, day("2024-06-02"));
        assert_eq!(resp.session.text, "- a\n- b");
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "> a\n> b\nx c");
    }

    #[tokio::test]
    async fn test_get_day() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-01-15"), "- !pay rent").unwrap();
        let app = app(&store);

        let (status, body) = call(&app, "GET", "/days/2024-01-15", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"][0]["text"], "pay rent");
        assert_eq!(body["entries"][0]["priority"], true);

        let (status, _) = call(&app, "GET", "/days/15-01-2024", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
