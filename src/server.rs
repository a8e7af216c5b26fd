use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::ServerConfig;
use crate::verdict::VerdictAggregator;

#[derive(Clone)]
pub struct ApiState {
    pub aggregator: Arc<VerdictAggregator>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: ApiState, config: &ServerConfig) -> Router {
    let static_files = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/check", post(check))
        .with_state(state)
        .fallback_service(static_files)
        .layer(cors_layer(&config.cors_origins))
}

pub async fn serve(state: ApiState, config: &ServerConfig) -> anyhow::Result<()> {
    let app = router(state, config);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!(
        "Listening on http://{addr} (static files from {})",
        config.static_dir
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn check(State(state): State<ApiState>, Json(request): Json<CheckRequest>) -> Response {
    let url = match request.url {
        Some(url) if !url.is_empty() => url,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "URL is required".to_string(),
                }),
            )
                .into_response();
        }
    };

    Json(state.aggregator.evaluate(&url).await).into_response()
}

fn cors_layer(allowed: &[String]) -> CorsLayer {
    let cors = if allowed.is_empty() || allowed.iter().any(|origin| origin.trim() == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = allowed
            .iter()
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Received shutdown signal, stopping server...");
}
