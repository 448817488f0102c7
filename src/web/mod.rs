//! Web API and form server for the wine quality checker.
//!
//! The API backs the single-page form embedded from `static/`. Each browser
//! tab starts a session and keeps its own list of good wines.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/features` - Form fields with defaults and display precision
//! - `GET /api/ranges` - Ideal values table (`?format=markdown` for Markdown)
//! - `POST /api/sessions` - Start a session
//! - `DELETE /api/sessions/{id}` - End a session
//! - `POST /api/sessions/{id}/predict` - Predict quality and get advice
//! - `GET /api/sessions/{id}/wines` - List saved good wines
//! - `POST /api/sessions/{id}/wines` - Name the last good wine
//! - `DELETE /api/sessions/{id}/wines` - Clear saved good wines

pub mod static_files;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::advisory::{self, Deviation, CLOSE_TO_IDEAL};
use crate::config::Config;
use crate::constants::GOOD_RECOMMENDATION;
use crate::models::{ranges, Feature, FeatureVector, QualityLabel, RANGES_NOTE, RANGE_TABLE};
use crate::predictor::{Predictor, QualityModel};
use crate::session::{SessionError, SessionId, SessionLimits, SessionStore};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Prediction adapter (immutable after load)
    predictor: Predictor,
    /// Per-session wine lists
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates application state, loading the model artifacts named in `config`.
    ///
    /// # Errors
    ///
    /// Fails if either artifact cannot be loaded. There is no fallback model.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let predictor = Predictor::load(&config.paths.scaler, &config.paths.model)?;
        Ok(Self {
            predictor,
            sessions: Arc::new(SessionStore::new(config.session.limits())),
        })
    }

    /// Creates application state around an already-loaded model.
    pub fn with_model(model: Arc<dyn QualityModel>, limits: SessionLimits) -> Self {
        Self {
            predictor: Predictor::new(model),
            sessions: Arc::new(SessionStore::new(limits)),
        }
    }

    /// Returns the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Form field description.
#[derive(Debug, Serialize)]
pub struct FeatureInfo {
    /// JSON key of the feature.
    pub key: &'static str,
    /// Display name used in advice.
    pub name: &'static str,
    /// Label next to the input.
    pub label: &'static str,
    /// Pre-filled value.
    pub default: f64,
    /// Decimals shown in the input.
    pub precision: u8,
}

impl From<Feature> for FeatureInfo {
    fn from(feature: Feature) -> Self {
        Self {
            key: feature.key(),
            name: feature.display_name(),
            label: feature.input_label(),
            default: feature.default_value(),
            precision: feature.display_precision(),
        }
    }
}

/// Feature list response.
#[derive(Debug, Serialize)]
pub struct FeatureListResponse {
    /// Features in trained order.
    pub features: Vec<FeatureInfo>,
}

/// One row of the ideal values table.
#[derive(Debug, Serialize)]
pub struct RangeInfo {
    /// JSON key of the feature.
    pub key: &'static str,
    /// Label of the feature.
    pub label: &'static str,
    /// Lowest ideal value.
    pub low: f64,
    /// Highest ideal value.
    pub high: f64,
    /// Measurement unit (may be empty).
    pub unit: &'static str,
    /// Why the measurement matters.
    pub rationale: &'static str,
}

/// Ideal values table response.
#[derive(Debug, Serialize)]
pub struct RangesResponse {
    /// Table rows in feature order.
    pub ranges: Vec<RangeInfo>,
    /// Explanatory note shown below the table.
    pub note: &'static str,
}

/// Query parameters for the ideal values table.
#[derive(Debug, Deserialize)]
pub struct RangesQuery {
    /// `markdown` to receive the table as Markdown text.
    pub format: Option<String>,
}

/// New session response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Identifier to use in subsequent requests.
    pub session_id: SessionId,
}

/// Prediction request.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Measurements keyed by feature key; missing keys use the defaults.
    #[serde(default)]
    pub inputs: HashMap<String, f64>,
    /// Optional name to save if the wine is predicted good.
    #[serde(default)]
    pub wine_name: Option<String>,
}

/// Prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Predicted label.
    pub label: QualityLabel,
    /// Confidence in the label as a percentage.
    pub confidence: f64,
    /// Confidence formatted with two decimals.
    pub confidence_display: String,
    /// Non-blocking notes about physically impossible inputs.
    pub input_warnings: Vec<String>,
    /// Recommendation for good wines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Whether `wine_name` was added to the list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    /// Saved good wines after this prediction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wines: Option<Vec<String>>,
    /// Advice lines for wines that are not good.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<Vec<String>>,
    /// Structured form of `advice`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviations: Option<Vec<Deviation>>,
    /// Message shown when a wine is not good but nothing is out of range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Wine list response.
#[derive(Debug, Serialize)]
pub struct WineListResponse {
    /// Saved wine names in insertion order.
    pub wines: Vec<String>,
}

/// Request to name the last good wine.
#[derive(Debug, Deserialize)]
pub struct SaveWineRequest {
    /// Name to save.
    pub name: String,
}

/// Response to a save request.
#[derive(Debug, Serialize)]
pub struct SaveWineResponse {
    /// Whether the name was added (false for empty or duplicate names).
    pub saved: bool,
    /// Saved wine names in insertion order.
    pub wines: Vec<String>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

impl From<SessionError> for (StatusCode, Json<ApiError>) {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::NotGood(_) => StatusCode::CONFLICT,
        };
        (status, Json(ApiError::new(err.to_string())))
    }
}

/// Parses a session id from the URL.
fn parse_session_id(raw: &str) -> Result<SessionId, (StatusCode, Json<ApiError>)> {
    raw.parse().map_err(|e: uuid::Error| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid session id", e.to_string())),
        )
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/features - List form fields.
async fn list_features() -> Json<FeatureListResponse> {
    Json(FeatureListResponse {
        features: Feature::ALL.into_iter().map(FeatureInfo::from).collect(),
    })
}

/// GET /api/ranges - Ideal values for good quality wine.
async fn get_ranges(Query(query): Query<RangesQuery>) -> Response {
    if query
        .format
        .as_deref()
        .is_some_and(|f| f.eq_ignore_ascii_case("markdown"))
    {
        return (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            ranges::render_markdown(),
        )
            .into_response();
    }

    let rows = RANGE_TABLE
        .iter()
        .map(|r| RangeInfo {
            key: r.feature.key(),
            label: r.feature.display_name(),
            low: r.low,
            high: r.high,
            unit: r.unit,
            rationale: r.rationale,
        })
        .collect();

    Json(RangesResponse {
        ranges: rows,
        note: RANGES_NOTE,
    })
    .into_response()
}

/// POST /api/sessions - Start a session.
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.sessions.create();
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// DELETE /api/sessions/{id} - End a session.
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let id = parse_session_id(&id)?;
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::NotFound(id).into())
    }
}

/// POST /api/sessions/{id}/predict - Predict quality of a sample.
async fn predict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<PredictResponse> {
    let id = parse_session_id(&id)?;

    let vector = FeatureVector::from_inputs(&request.inputs).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid inputs", e.to_string())),
        )
    })?;

    let result = state.predictor.predict(&vector);
    state.sessions.record_prediction(id, result.label)?;

    let mut response = PredictResponse {
        label: result.label,
        confidence: result.confidence,
        confidence_display: result.confidence_display(),
        input_warnings: vector.implausible_values(),
        recommendation: None,
        saved: None,
        wines: None,
        advice: None,
        deviations: None,
        fallback: None,
    };

    if result.label.is_good() {
        let (saved, wines) = match request.wine_name.as_deref() {
            Some(name) => {
                let (added, wines) = state.sessions.save_wine(id, name)?;
                (Some(added), wines)
            }
            None => (None, state.sessions.wines(id)?),
        };
        response.recommendation = Some(GOOD_RECOMMENDATION.to_string());
        response.saved = saved;
        response.wines = Some(wines);
    } else {
        let deviations = advisory::deviations(&vector, &RANGE_TABLE);
        let advice: Vec<String> = deviations.iter().map(Deviation::message).collect();
        if advice.is_empty() {
            response.fallback = Some(CLOSE_TO_IDEAL.to_string());
        }
        response.advice = Some(advice);
        response.deviations = Some(deviations);
    }

    Ok(Json(response))
}

/// GET /api/sessions/{id}/wines - List saved good wines.
async fn list_wines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WineListResponse> {
    let id = parse_session_id(&id)?;
    let wines = state.sessions.wines(id)?;
    Ok(Json(WineListResponse { wines }))
}

/// POST /api/sessions/{id}/wines - Name the last good wine.
async fn save_wine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SaveWineRequest>,
) -> ApiResult<SaveWineResponse> {
    let id = parse_session_id(&id)?;

    let (saved, wines) = state.sessions.save_wine(id, &request.name).map_err(|e| {
        warn!("Rejected wine name for session {id}: {e}");
        e
    })?;

    if saved {
        debug!("Session {id} saved wine '{}'", request.name);
    }

    Ok(Json(SaveWineResponse { saved, wines }))
}

/// DELETE /api/sessions/{id}/wines - Clear saved good wines.
async fn clear_wines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WineListResponse> {
    let id = parse_session_id(&id)?;
    state.sessions.clear_wines(id)?;
    debug!("Session {id} cleared its wine list");
    Ok(Json(WineListResponse { wines: Vec::new() }))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The server is meant to run locally next to the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Reference data
        .route("/api/features", get(list_features))
        .route("/api/ranges", get(get_ranges))
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(end_session))
        .route("/api/sessions/{id}/predict", post(predict))
        .route(
            "/api/sessions/{id}/wines",
            get(list_wines).post(save_wine).delete(clear_wines),
        )
        // Form frontend
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `config` - Application configuration
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or the server fails to start.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;
    let app = create_router(state);

    if !static_files::has_embedded_assets() {
        warn!("No embedded frontend found; only the JSON API is available");
    }

    info!("Starting wine quality checker on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
