//! Axum HTTP server: stateless rendering endpoints for the PANVE frontend.
//!
//! Every request carries the assessment responses; nothing is stored. The
//! catalog is shared as `Arc<Catalog>` across async handlers.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/catalog` | Levels, sections, columns and questions in use |
//! | POST | `/matrix` | Resolved matrix grid as JSON |
//! | POST | `/matrix.svg` | Matrix drawn as SVG |
//! | POST | `/series` | Per-question status percentages (`?policy=evaluated\|possible`) |
//! | POST | `/series.svg` | Stacked bar chart as SVG |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregation::{build_series, DenominatorPolicy, Series};
use crate::catalog::Catalog;
use crate::matrix_layout::{build_matrix_with_meta, ReportMeta};
use crate::responses::Responses;
use crate::svg;

pub type AppState = Arc<Catalog>;

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

pub fn create_router(catalog: Arc<Catalog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/catalog", get(handle_get_catalog))
        .route("/matrix", post(handle_matrix))
        .route("/matrix.svg", post(handle_matrix_svg))
        .route("/series", post(handle_series))
        .route("/series.svg", post(handle_series_svg))
        .layer(cors)
        .with_state(catalog)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RenderRequest {
    /// Decoded leniently: anything that is not a responses object renders empty.
    #[serde(default)]
    responses: serde_json::Value,
    name: Option<String>,
    date: Option<String>,
}

impl RenderRequest {
    fn responses(&self, catalog: &Catalog) -> Responses {
        let responses = Responses::from_json(&self.responses);
        catalog.warn_unknown_questions(&responses);
        responses
    }

    fn meta(&self) -> ReportMeta {
        match &self.date {
            Some(date) => ReportMeta::new(self.name.clone(), date.clone()),
            None => ReportMeta::dated_today(self.name.clone()),
        }
    }
}

#[derive(Deserialize)]
struct SeriesQuery {
    policy: Option<String>,
}

fn error_response(status: StatusCode, msg: &str) -> ErrorResponse {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn svg_response(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], body)
}

fn series_for(
    catalog: &Catalog,
    query: &SeriesQuery,
    req: &RenderRequest,
) -> Result<Series, ErrorResponse> {
    let policy = match query.policy.as_deref() {
        None => DenominatorPolicy::default(),
        Some(raw) => DenominatorPolicy::parse(raw).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "policy must be 'evaluated' or 'possible'",
            )
        })?,
    };
    Ok(build_series(Some(&req.responses(catalog)), catalog, policy))
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_catalog(State(catalog): State<AppState>) -> Json<Catalog> {
    Json(catalog.as_ref().clone())
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_matrix(
    State(catalog): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> impl IntoResponse {
    let responses = req.responses(&catalog);
    let grid = build_matrix_with_meta(Some(&responses), &catalog, &req.meta());
    Json(grid)
}

async fn handle_matrix_svg(
    State(catalog): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> impl IntoResponse {
    let responses = req.responses(&catalog);
    let meta = req.meta();
    let grid = build_matrix_with_meta(Some(&responses), &catalog, &meta);
    svg_response(svg::matrix_svg(&grid, &meta))
}

async fn handle_series(
    State(catalog): State<AppState>,
    Query(query): Query<SeriesQuery>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let series = series_for(&catalog, &query, &req)?;
    Ok(Json(serde_json::json!({
        "policy": series.policy,
        "labels": series.labels(),
        "datasets": series.datasets(),
        "entries": series.entries,
    })))
}

async fn handle_series_svg(
    State(catalog): State<AppState>,
    Query(query): Query<SeriesQuery>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let series = series_for(&catalog, &query, &req)?;
    Ok(svg_response(svg::chart_svg(&series)))
}
