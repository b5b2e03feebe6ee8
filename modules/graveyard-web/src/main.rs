use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use graveyard_rewards::ScoreSchedule;
use tapestry_client::TapestryClient;

mod config;
mod rest;

use config::Config;

// --- App State ---

pub struct AppState {
    /// None when TAPESTRY_API_KEY is unset; every handler then answers 500
    /// before attempting any upstream call.
    pub tapestry: Option<TapestryClient>,
    pub schedule: ScoreSchedule,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("graveyard_web=info".parse()?)
                .add_directive("graveyard_rewards=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    let tapestry = match config.tapestry_api_key {
        Some(key) => Some(TapestryClient::new(key)),
        None => {
            warn!("TAPESTRY_API_KEY not set, requests will fail with 500 until it is configured");
            None
        }
    };

    let state = Arc::new(AppState {
        tapestry,
        schedule: ScoreSchedule::default(),
    });

    let app = Router::new()
        .route("/rewards", get(rest::rewards))
        // CRUD proxies onto Tapestry
        .route("/api/tapestry/profile", post(rest::create_profile))
        .route("/api/tapestry/post", post(rest::create_post))
        .route("/api/tapestry/quest", post(rest::create_quest))
        .route("/api/tapestry/like", post(rest::like))
        .route("/api/tapestry/comment", post(rest::create_comment))
        .route("/api/tapestry/comments", get(rest::list_comments))
        .route("/api/tapestry/feed", get(rest::feed))
        .with_state(state)
        // Logging layer: method + path + status + latency only (no query
        // params — wallet addresses ride in them)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Graveyard web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
