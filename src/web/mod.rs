//! Web API module for Pagesmith.
//!
//! This module provides the REST API behind the page builder frontend:
//! template marketplace browsing and keyword search, per-user layout
//! storage, and export of layouts as page source.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/templates` - List templates (optional ?category=)
//! - `GET /api/templates/{id}` - Get a template with its layout content
//! - `POST /api/templates/match` - Keyword search over the template catalog
//! - `POST /api/templates/{id}/use` - Copy a template into a new layout
//! - `GET /api/layouts` - List the caller's layouts
//! - `POST /api/layouts` - Create a layout
//! - `GET /api/layouts/{id}` - Get one of the caller's layouts
//! - `PUT /api/layouts/{id}` - Update one of the caller's layouts
//! - `DELETE /api/layouts/{id}` - Delete one of the caller's layouts
//! - `GET /api/layouts/{id}/export` - Download generated page source
//!
//! Every `/api/layouts` route and the template "use" route require the
//! `X-User-Id` header set by the authenticating gateway.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::codegen;
use crate::config::Config;
use crate::matcher::{
    found_message, order_by_rank, KeywordMatcher, KeywordTable, MatchOutcome, KEYWORD_MATCH_TYPE,
    NO_MATCH_MESSAGE,
};
use crate::models::{Layout, LayoutBox, Template, TemplateSummary};
use crate::services::{LayoutService, StoreError, TemplateCatalog, TemplateSource};

/// Header carrying the authenticated user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Keyword matcher (immutable after load)
    matcher: Arc<KeywordMatcher>,
    /// Template records
    templates: Arc<dyn TemplateSource>,
    /// Saved layout storage
    layouts: LayoutService,
}

impl AppState {
    /// Creates application state from configuration.
    ///
    /// Loads the keyword table and template catalog named in `config`
    /// (embedded defaults when unset) and stores layouts under
    /// `<data_dir>/layouts`.
    pub fn new(config: Config, data_dir: PathBuf) -> anyhow::Result<Self> {
        let table = KeywordTable::load(config.paths.keyword_mappings.as_deref())?;
        let catalog = TemplateCatalog::load(config.paths.template_catalog.as_deref())?;

        Ok(Self::with_template_source(
            &config,
            data_dir,
            table,
            Arc::new(catalog),
        ))
    }

    /// Creates application state around an explicit template source.
    pub fn with_template_source(
        config: &Config,
        data_dir: PathBuf,
        table: KeywordTable,
        templates: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            matcher: Arc::new(KeywordMatcher::new(table, config.match_options())),
            templates,
            layouts: LayoutService::new(data_dir.join("layouts")),
        }
    }

    /// Returns the layout store.
    #[must_use]
    pub fn layouts(&self) -> &LayoutService {
        &self.layouts
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

/// Query parameters for the template listing.
#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    /// Restrict the listing to one category.
    pub category: Option<String>,
}

/// Template list response.
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Always true.
    pub success: bool,
    /// Matching template summaries.
    pub templates: Vec<TemplateSummary>,
    /// Number of templates returned.
    pub total: usize,
}

/// Single template response.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    /// Always true.
    pub success: bool,
    /// Full template record.
    pub template: Template,
}

/// Keyword search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Always true; "no templates" is a normal outcome.
    pub success: bool,
    /// Matching templates in rank order.
    pub templates: Vec<TemplateSummary>,
    /// Human-readable summary.
    pub message: String,
    /// How the templates were found (only present on a match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    /// Categories that contributed to the match (only present on a match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_categories: Option<Vec<String>>,
}

impl MatchResponse {
    fn no_match() -> Self {
        Self {
            success: true,
            templates: Vec::new(),
            message: NO_MATCH_MESSAGE.to_string(),
            match_type: None,
            matched_categories: None,
        }
    }

    fn matched(templates: Vec<TemplateSummary>, categories: Vec<String>) -> Self {
        Self {
            success: true,
            message: found_message(templates.len()),
            templates,
            match_type: Some(KEYWORD_MATCH_TYPE.to_string()),
            matched_categories: Some(categories),
        }
    }
}

/// Layout create/update request.
#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    /// Display name.
    pub name: String,
    /// Description; unchanged on update when absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Boxes; unchanged on update when absent.
    #[serde(default)]
    pub boxes: Option<Vec<LayoutBox>>,
}

/// Layout list response.
#[derive(Debug, Serialize)]
pub struct LayoutListResponse {
    /// Always true.
    pub success: bool,
    /// Layout summaries, newest first.
    pub layouts: Vec<LayoutSummary>,
    /// Number of layouts returned.
    pub total: usize,
}

/// Summary of a saved layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    /// Layout ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Number of components across all boxes.
    pub component_count: usize,
    /// Creation timestamp (RFC 3339 format).
    pub created: String,
    /// Last modified timestamp (RFC 3339 format).
    pub modified: String,
}

impl From<&Layout> for LayoutSummary {
    fn from(layout: &Layout) -> Self {
        Self {
            id: layout.id.clone(),
            name: layout.name.clone(),
            description: layout.description.clone(),
            component_count: layout.component_count(),
            created: layout.created.to_rfc3339(),
            modified: layout.modified.to_rfc3339(),
        }
    }
}

/// Single layout response.
#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    /// Always true.
    pub success: bool,
    /// Full layout.
    pub layout: Layout,
}

impl LayoutResponse {
    fn new(layout: Layout) -> Json<Self> {
        Json(Self {
            success: true,
            layout,
        })
    }
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Always false.
    pub success: bool,
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiFailure = (StatusCode, Json<ApiError>);

fn bad_request(error: impl Into<String>) -> ApiFailure {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(error)))
}

fn internal_error(context: &str, err: &anyhow::Error) -> ApiFailure {
    error!("{context}: {err:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("Internal server error")),
    )
}

fn store_failure(err: StoreError) -> ApiFailure {
    match err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, Json(ApiError::new(err.to_string()))),
        StoreError::InvalidId(_) => bad_request(err.to_string()),
        StoreError::Invalid(details) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid layout", details)),
        ),
        StoreError::Other(e) => internal_error("Layout store failure", &e),
    }
}

// ============================================================================
// Caller Identity
// ============================================================================

/// Authenticated caller, taken from the `X-User-Id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub String);

fn caller_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_headers(&parts.headers).map(Caller).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Missing or empty X-User-Id header")),
            )
        })
    }
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

/// GET /api/templates - List templates, optionally by category.
async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<TemplateListResponse>, ApiFailure> {
    let templates = state
        .templates
        .list()
        .map_err(|e| internal_error("Failed to list templates", &e))?;

    let templates: Vec<TemplateSummary> = templates
        .iter()
        .filter(|t| {
            query
                .category
                .as_deref()
                .map_or(true, |category| t.category == category)
        })
        .map(TemplateSummary::from)
        .collect();

    let total = templates.len();
    Ok(Json(TemplateListResponse {
        success: true,
        templates,
        total,
    }))
}

fn parse_template_id(raw: &str) -> Result<i64, ApiFailure> {
    raw.parse()
        .map_err(|_| bad_request(format!("Invalid template id: {raw}")))
}

fn find_template(state: &AppState, raw_id: &str) -> Result<Template, ApiFailure> {
    let id = parse_template_id(raw_id)?;
    state
        .templates
        .get(id)
        .map_err(|e| internal_error("Failed to load template", &e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(format!("Template {id} not found"))),
            )
        })
}

/// GET /api/templates/{id} - Get a template with its layout content.
async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateResponse>, ApiFailure> {
    let template = find_template(&state, &id)?;
    Ok(Json(TemplateResponse {
        success: true,
        template,
    }))
}

/// POST /api/templates/match - Keyword search over the catalog.
async fn match_templates(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiFailure> {
    let Json(body) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details(
                "Request body must be JSON",
                rejection.body_text(),
            )),
        )
    })?;

    let query = body
        .get("query")
        .and_then(Value::as_str)
        .ok_or_else(|| bad_request("Field 'query' is required and must be a string"))?;

    let ranked = match state.matcher.rank(query) {
        MatchOutcome::Matched(ranked) => ranked,
        MatchOutcome::NoMatch => return Ok(Json(MatchResponse::no_match())),
    };

    let fetched = state
        .templates
        .fetch_by_ids(&ranked.template_ids)
        .map_err(|e| internal_error("Template lookup failed during match", &e))?;

    if fetched.is_empty() {
        debug!(ids = ?ranked.template_ids, "ranked templates missing from catalog");
        return Ok(Json(MatchResponse::no_match()));
    }

    let ordered = order_by_rank(fetched, &ranked.template_ids, |t| t.id);
    let summaries = ordered.iter().map(TemplateSummary::from).collect();

    Ok(Json(MatchResponse::matched(
        summaries,
        ranked.matched_categories,
    )))
}

/// POST /api/templates/{id}/use - Copy a template into a new layout.
async fn use_template(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<LayoutResponse>), ApiFailure> {
    let template = find_template(&state, &id)?;

    let mut layout = Layout::from_content(user, template.name, template.layout)
        .map_err(|e| internal_error("Template produced an invalid layout", &e))?;
    layout.description = template.description;

    state.layouts.save(&layout).map_err(store_failure)?;
    info!(layout = %layout.id, template = template.id, "layout created from template");

    Ok((StatusCode::CREATED, LayoutResponse::new(layout)))
}

/// GET /api/layouts - List the caller's layouts.
async fn list_layouts(
    State(state): State<AppState>,
    Caller(user): Caller,
) -> Result<Json<LayoutListResponse>, ApiFailure> {
    let layouts: Vec<LayoutSummary> = state
        .layouts
        .list_for_owner(&user)
        .map_err(store_failure)?
        .iter()
        .map(LayoutSummary::from)
        .collect();

    let total = layouts.len();
    Ok(Json(LayoutListResponse {
        success: true,
        layouts,
        total,
    }))
}

fn parse_layout_request(
    body: Result<Json<LayoutRequest>, JsonRejection>,
) -> Result<LayoutRequest, ApiFailure> {
    body.map(|Json(request)| request).map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details(
                "Invalid layout request",
                rejection.body_text(),
            )),
        )
    })
}

/// POST /api/layouts - Create a layout.
async fn create_layout(
    State(state): State<AppState>,
    Caller(user): Caller,
    body: Result<Json<LayoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LayoutResponse>), ApiFailure> {
    let request = parse_layout_request(body)?;

    let mut layout = Layout::new(user, request.name).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid layout", e.to_string())),
        )
    })?;
    layout.description = request.description.unwrap_or_default();
    layout.boxes = request.boxes.unwrap_or_default();

    state.layouts.save(&layout).map_err(store_failure)?;

    Ok((StatusCode::CREATED, LayoutResponse::new(layout)))
}

/// GET /api/layouts/{id} - Get one of the caller's layouts.
async fn get_layout(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<Json<LayoutResponse>, ApiFailure> {
    let layout = state.layouts.load_owned(&id, &user).map_err(store_failure)?;
    Ok(LayoutResponse::new(layout))
}

/// PUT /api/layouts/{id} - Update one of the caller's layouts.
async fn update_layout(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
    body: Result<Json<LayoutRequest>, JsonRejection>,
) -> Result<Json<LayoutResponse>, ApiFailure> {
    let request = parse_layout_request(body)?;
    let mut layout = state.layouts.load_owned(&id, &user).map_err(store_failure)?;

    layout.name = request.name;
    if let Some(description) = request.description {
        layout.description = description;
    }
    if let Some(boxes) = request.boxes {
        layout.boxes = boxes;
    }
    layout.touch();

    state.layouts.save(&layout).map_err(store_failure)?;

    Ok(LayoutResponse::new(layout))
}

/// DELETE /api/layouts/{id} - Delete one of the caller's layouts.
async fn delete_layout(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    state.layouts.delete_owned(&id, &user).map_err(store_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/layouts/{id}/export - Download generated page source.
async fn export_layout(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiFailure> {
    let layout = state.layouts.load_owned(&id, &user).map_err(store_failure)?;

    let source = codegen::generate_page(&layout);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        codegen::export_filename(&layout.name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        source,
    ))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; identity comes from the gateway header
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Template endpoints
        .route("/api/templates", get(list_templates))
        .route("/api/templates/match", post(match_templates))
        .route("/api/templates/{id}", get(get_template))
        .route("/api/templates/{id}/use", post(use_template))
        // Layout endpoints
        .route("/api/layouts", get(list_layouts).post(create_layout))
        .route(
            "/api/layouts/{id}",
            get(get_layout).put(update_layout).delete(delete_layout),
        )
        .route("/api/layouts/{id}/export", get(export_layout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `config` - Application configuration
/// * `data_dir` - Directory holding saved layouts
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the keyword table or catalog fails to load, or the
/// server fails to start.
pub async fn run_server(config: Config, data_dir: PathBuf, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config, data_dir)?;
    state.layouts().ensure_root()?;
    let app = create_router(state);

    info!("Starting Pagesmith web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
