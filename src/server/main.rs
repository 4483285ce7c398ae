//! HTTP server for nearby-place lookups.
//!
//! Exposes one operation: given an origin, a radius, and a travel-time
//! budget, return the known places that satisfy both, sorted by road
//! distance.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use tamarack::matrix::{GoogleMatrixProvider, MatrixClient, MatrixError};
use tamarack::models::{NearbyRequest, TravelResult};
use tamarack::pipeline::{self, PipelineError};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Nearby locations API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Gazetteer file path
    #[arg(long, default_value = "data/locations.txt")]
    data: PathBuf,

    /// Distance matrix endpoint override
    #[arg(long)]
    matrix_endpoint: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    data_path: PathBuf,
    matrix: MatrixClient<GoogleMatrixProvider>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Tamarack Nearby Locations Server");
    info!("Gazetteer file: {}", args.data.display());

    let api_key = std::env::var("GOOGLE_API_KEY")
        .context("GOOGLE_API_KEY environment variable is not set")?;
    let provider = GoogleMatrixProvider::new(api_key, args.matrix_endpoint.as_deref())?;

    let state = Arc::new(AppState {
        data_path: args.data,
        matrix: MatrixClient::new(provider),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/nearby-locations", post(nearby_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gazetteer = state.data_path.is_file();

    Json(HealthResponse {
        status: if gazetteer { "ok" } else { "degraded" },
        gazetteer,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    gazetteer: bool,
}

/// Nearby locations by radius and travel time
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NearbyRequest>,
) -> Result<Json<Vec<TravelResult>>, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let results = pipeline::handle(&state.data_path, &state.matrix, &req)
        .await
        .map_err(map_pipeline_error)?;

    Ok(Json(results))
}

/// Map pipeline failures onto the response contract: upstream rejections are
/// the caller's problem (400, upstream message included); everything else is
/// a generic 500 with the cause kept server-side.
fn map_pipeline_error(err: PipelineError) -> (StatusCode, String) {
    match err {
        PipelineError::Load(cause) => {
            error!("gazetteer load failed: {cause}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error loading or filtering locations".to_string(),
            )
        }
        PipelineError::Matrix(MatrixError::Transport(cause)) => {
            error!("distance matrix transport failure: {cause}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error querying distance matrix".to_string(),
            )
        }
        PipelineError::Matrix(matrix_err) => (StatusCode::BAD_REQUEST, matrix_err.to_string()),
    }
}
