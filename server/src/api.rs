//! HTTP API - actor records, derived sheets and skill rolls

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use loresheet::check::{roll_skill, CheckError, SkillCheck};
use loresheet::roll::MAX_POOL;
use loresheet::sheet::SheetView;
use loresheet::store::{ActorStore, StoreError};
use loresheet::tooltips::Tooltips;
use loresheet::{Actor, Character, Dice};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Reply body for a successful save.
pub const SAVED: &str = "File saved successfully";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ActorStore>,
    pub tooltips: Arc<Tooltips>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error("actor '{0}' is not a character")]
    NotACharacter(String),
    #[error("advantage {0} is outside -{max}..={max}", max = MAX_POOL)]
    Advantage(i32),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Json { .. } | StoreError::Actor(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Store(StoreError::Io { .. }) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Check(CheckError::UnknownSkill(_)) => StatusCode::NOT_FOUND,
            ApiError::Check(_) | ApiError::NotACharacter(_) | ApiError::Advantage(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Run blocking store work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}

async fn load_character(state: &AppState, name: String) -> Result<Box<Character>, ApiError> {
    let store = state.store.clone();
    let key = name.clone();
    match blocking(move || store.load_actor(&key)).await? {
        Actor::Character(c) => Ok(c),
        Actor::Generic(_) => Err(ApiError::NotACharacter(name)),
    }
}

/// Build the API router, falling back to static files from `public_dir`.
pub fn router(state: AppState, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/files", get(list_files))
        .route("/api/actor/{name}", get(get_actor).post(save_actor))
        .route("/api/sheet/{name}", get(get_sheet))
        .route("/api/roll", post(roll))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.store.clone();
    Ok(Json(blocking(move || store.list()).await?))
}

async fn get_actor(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.clone();
    Ok(Json(blocking(move || store.load(&name)).await?))
}

async fn save_actor(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<&'static str, ApiError> {
    let store = state.store.clone();
    blocking(move || store.save(&name, &body)).await?;
    Ok(SAVED)
}

async fn get_sheet(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SheetView>, ApiError> {
    let character = load_character(&state, name).await?;
    Ok(Json(SheetView::build(&character, &state.tooltips)))
}

/// Skill roll request. `seed` makes the roll repeatable.
#[derive(Debug, Deserialize)]
pub struct RollRequest {
    pub actor: String,
    pub skill: String,
    #[serde(default)]
    pub advantage: i32,
    #[serde(default)]
    pub seed: Option<u64>,
}

async fn roll(
    State(state): State<AppState>,
    Json(req): Json<RollRequest>,
) -> Result<Json<SkillCheck>, ApiError> {
    if req.advantage.unsigned_abs() as usize > MAX_POOL {
        return Err(ApiError::Advantage(req.advantage));
    }
    let character = load_character(&state, req.actor).await?;
    let mut dice = Dice::seeded_or_random(req.seed);
    let check = roll_skill(&mut dice, &character, &req.skill, req.advantage)?;
    Ok(Json(check))
}
