use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};

use super::messages::post_message;
use super::status::{get_info, get_status, status_events};
use super::tags::{lookup_tag, suggest_tags};
use crate::context::SyncContext;

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn api_router() -> Router<Arc<SyncContext>> {
    Router::new()
        .route("/messages", post(post_message))
        .route("/status", get(get_status))
        .route("/status/events", get(status_events))
        .route("/info", get(get_info))
        .route("/tags", get(suggest_tags))
        .route("/tags/lookup/{tag}", get(lookup_tag))
}

pub fn create_router(ctx: Arc<SyncContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(ctx)
}
