//! HTTP API for the Orakl
//!
//! Endpoints:
//! - GET   /health                - Health check
//! - GET   /signs?tier=quick|deep - Sign picker catalog
//! - POST  /reading               - Evaluate + generate a reading
//! - POST  /analyze               - Deterministic plan only
//! - GET   /reading/:id           - Stored reading
//! - POST  /journey               - Start a Deep Reading journey
//! - GET   /journey/:id           - Journey status
//! - PATCH /journey/:id           - Partial update
//! - POST  /journey/:id/signs     - Log signs for a day
//! - POST  /journey/:id/reading   - Deep reading over every logged sign

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::catalog::categories;
use crate::core::engine::Oracle;
use crate::core::generator::TextGenerator;
use crate::core::journey::JourneyBook;
use crate::core::reading::generate_reading;
use crate::core::store::ReadingStore;
use crate::types::{
    Journey, JourneyPatch, Lean, ReadingPlan, ReadingRecord, ReadingRequest, SignCategory, Tier,
};
use crate::OraklError;

/// App state
pub struct AppState {
    pub oracle: Oracle,
    pub generator: Arc<dyn TextGenerator>,
    pub store: Option<Arc<dyn ReadingStore>>,
    pub journeys: JourneyBook,
}

impl AppState {
    pub fn new(
        oracle: Oracle,
        generator: Arc<dyn TextGenerator>,
        store: Option<Arc<dyn ReadingStore>>,
    ) -> Self {
        Self {
            oracle,
            generator,
            store,
            journeys: JourneyBook::new(),
        }
    }

    fn store(&self) -> Option<&dyn ReadingStore> {
        self.store.as_deref()
    }
}

/// Error body: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", what),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<OraklError> for ApiError {
    fn from(e: OraklError) -> Self {
        match e {
            OraklError::InvalidRequest(message) => Self::bad_request(message),
            e if e.is_upstream() => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Failed to generate reading".to_string(),
            },
            e => {
                error!("Request failed [{}]: {}", e.code(), e);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal error".to_string(),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub signs_known: usize,
}

#[derive(Debug, Deserialize)]
pub struct SignsQuery {
    pub tier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignsResponse {
    pub tier: Tier,
    pub categories: Vec<SignCategory>,
}

/// Reading request body; optional fields are validated by hand so a
/// missing question or sign list is a 400
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingBody {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub signs: Option<Vec<String>>,
    #[serde(default)]
    pub path_type: Option<String>,
    #[serde(default)]
    pub is_deep_reading: Option<bool>,
    #[serde(default)]
    pub day_count: Option<u8>,
}

impl ReadingBody {
    fn into_request(self) -> Result<ReadingRequest, ApiError> {
        let question = self
            .question
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("question is required"))?;
        let signs = self
            .signs
            .ok_or_else(|| ApiError::bad_request("signs are required"))?;

        Ok(ReadingRequest {
            question,
            signs,
            path_type: self.path_type,
            is_deep_reading: self.is_deep_reading.unwrap_or(false),
            day_count: self.day_count,
        })
    }
}

/// Analysis summary returned with a reading
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    #[serde(rename = "type")]
    pub question_type: String,
    pub domain: String,
    pub urgency: String,
    pub sentiment: String,
    pub final_lean: Lean,
    pub final_confidence: f64,
    pub combination_count: usize,
    pub combinations: Vec<String>,
    pub sufficient: bool,
    pub template: String,
}

impl AnalysisSummary {
    fn from_plan(plan: &ReadingPlan) -> Self {
        Self {
            question_type: plan.analysis.question_type.as_str().to_string(),
            domain: plan.analysis.domain.as_str().to_string(),
            urgency: plan.analysis.urgency.as_str().to_string(),
            sentiment: plan.analysis.sentiment.as_str().to_string(),
            final_lean: plan.verdict.final_lean,
            final_confidence: plan.verdict.final_confidence,
            combination_count: plan.combinations.len(),
            combinations: plan.combinations.iter().map(|c| c.name.clone()).collect(),
            sufficient: plan.sign_check.sufficient,
            template: plan.template.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub reading: String,
    pub verdict: String,
    pub id: Option<String>,
    pub analysis: AnalysisSummary,
}

#[derive(Debug, Deserialize)]
pub struct NewJourneyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct LogSignsRequest {
    #[serde(default)]
    pub day: Option<u8>,
    pub signs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JourneyReadingResponse {
    pub journey: Journey,
    pub reading: String,
    pub verdict: String,
    pub id: Option<String>,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signs", get(list_signs))
        .route("/reading", post(create_reading))
        .route("/analyze", post(analyze))
        .route("/reading/:id", get(get_reading))
        .route("/journey", post(create_journey))
        .route("/journey/:id", get(get_journey).patch(update_journey))
        .route("/journey/:id/signs", post(log_journey_signs))
        .route("/journey/:id/reading", post(journey_reading))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        signs_known: state.oracle.table().len(),
    })
}

/// Sign picker catalog; deep includes quick
async fn list_signs(Query(query): Query<SignsQuery>) -> Result<Json<SignsResponse>, ApiError> {
    let tier = match query.tier.as_deref() {
        None | Some("quick") => Tier::Quick,
        Some("deep") => Tier::Deep,
        Some(other) => return Err(ApiError::bad_request(format!("unknown tier {:?}", other))),
    };

    Ok(Json(SignsResponse {
        tier,
        categories: categories(tier),
    }))
}

/// Evaluate and generate a reading
async fn create_reading(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReadingBody>, JsonRejection>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;

    let plan = state.oracle.evaluate(&request);
    let outcome = generate_reading(&plan, state.generator.as_ref(), state.store()).await?;

    Ok(Json(ReadingResponse {
        reading: outcome.reading,
        verdict: outcome.verdict,
        id: outcome.id,
        analysis: AnalysisSummary::from_plan(&plan),
    }))
}

/// Deterministic plan, no generator call
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReadingBody>, JsonRejection>,
) -> Result<Json<ReadingPlan>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    Ok(Json(state.oracle.evaluate(&request)))
}

/// Stored reading
async fn get_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReadingRecord>, ApiError> {
    let store = state.store().ok_or_else(|| ApiError::not_found("Reading"))?;
    let record = store.load(&id)?.ok_or_else(|| ApiError::not_found("Reading"))?;
    Ok(Json(record))
}

async fn create_journey(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewJourneyRequest>, JsonRejection>,
) -> Result<Json<Journey>, ApiError> {
    let Json(req) = body?;
    let journey = state.journeys.create(&req.email, &req.question).await?;
    Ok(Json(journey))
}

async fn get_journey(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Journey>, ApiError> {
    let journey = state.journeys.get(&id).await.ok_or_else(|| ApiError::not_found("Journey"))?;
    Ok(Json(journey))
}

async fn update_journey(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<JourneyPatch>, JsonRejection>,
) -> Result<Json<Journey>, ApiError> {
    let Json(patch) = body?;
    let journey = state
        .journeys
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Journey"))?;
    Ok(Json(journey))
}

async fn log_journey_signs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<LogSignsRequest>, JsonRejection>,
) -> Result<Json<Journey>, ApiError> {
    let Json(req) = body?;
    let journey = state
        .journeys
        .log_signs(&id, req.day, req.signs)
        .await?
        .ok_or_else(|| ApiError::not_found("Journey"))?;
    Ok(Json(journey))
}

async fn journey_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JourneyReadingResponse>, ApiError> {
    let (journey, outcome) = state
        .journeys
        .complete(&id, &state.oracle, state.generator.as_ref(), state.store())
        .await?
        .ok_or_else(|| ApiError::not_found("Journey"))?;

    Ok(Json(JourneyReadingResponse {
        journey,
        reading: outcome.reading,
        verdict: outcome.verdict,
        id: outcome.id,
    }))
}

/// Run the HTTP server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), OraklError> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Orakl API running on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
