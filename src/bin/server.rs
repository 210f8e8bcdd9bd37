use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use cut_planner::engine::{MaterialReport, PackOutcome, pack_material, plan_quotes};
use cut_planner::error::Error;
use cut_planner::model::{PackRequest, PlanRequest};
use cut_planner::solver::{DEFAULT_MAX_PIECES, PackOptions};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn options_from_env() -> PackOptions {
    PackOptions {
        kerf: env_or("KERF_MM", 0),
        max_pieces: Some(env_or("MAX_PIECES", DEFAULT_MAX_PIECES)),
        time_limit: std::env::var("PACK_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis),
    }
}

fn status_for(e: &Error) -> StatusCode {
    if e.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

async fn pack(
    State(options): State<PackOptions>,
    Json(req): Json<PackRequest>,
) -> Result<Json<PackOutcome>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    // Packing is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || pack_material(&req, &options))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    outcome
        .map(Json)
        .map_err(|e| (status_for(&e), e.to_string()))
}

async fn plan(
    State(options): State<PackOptions>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<Vec<MaterialReport>>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /plan"
    );

    let reports = tokio::task::spawn_blocking(move || plan_quotes(&req, &options))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(reports))
}

fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    // Must outlive the runtime so queued events are flushed on shutdown
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    let options = options_from_env();
    tracing::info!(?options, "starting server");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .route("/plan", post(plan))
        .with_state(options)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
