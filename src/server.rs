use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::handlers::{
    create_funko, delete_funko, get_funko, list_funkos, patch_funko, update_funko,
};
use crate::service::FunkoService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FunkoService>,
    pub metrics: PrometheusHandle,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "funko-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus exposition endpoint
async fn metrics_text(State(state): State<AppState>) -> String {
    state.metrics.render()
}

async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let started = std::time::Instant::now();
    let response = next.run(req).await;
    crate::metrics::http_request(method.as_str(), response.status().as_u16());
    crate::metrics::request_duration(started.elapsed().as_secs_f64());
    response
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/funkos", get(list_funkos).post(create_funko))
        .route(
            "/funkos/:id",
            get(get_funko)
                .put(update_funko)
                .patch(patch_funko)
                .delete(delete_funko),
        )
        .layer(middleware::from_fn(track_requests))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: AppState, config: &Config) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = config.bind_addr();
    info!("funko api listening on {}", addr);

    println!("🚀 HTTP server running on http://{}", addr);
    println!("💚 Health check: http://{}/health", addr);
    println!("📦 Funkos:       http://{}/funkos", addr);
    println!("📈 Metrics:      http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
