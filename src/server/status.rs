use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures_util::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::context::SyncContext;
use crate::server::response::{ApiError, ApiResponse, SyncResultExt};
use crate::status::DOWNLOAD_STATUS_EVENT;

pub async fn get_status(State(ctx): State<Arc<SyncContext>>) -> impl IntoResponse {
    Json(ApiResponse::success(ctx.status().current()))
}

/// Streams every status change, starting with the current value.
pub async fn status_events(
    State(ctx): State<Arc<SyncContext>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let current = ctx.status().current();
    let updates = BroadcastStream::new(ctx.status().subscribe()).filter_map(Result::ok);

    let stream = tokio_stream::once(current)
        .chain(updates)
        .map(|status| Event::default().event(DOWNLOAD_STATUS_EVENT).json_data(status));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn get_info(State(ctx): State<Arc<SyncContext>>) -> impl IntoResponse {
    let info = ctx.snapshot_info().api_err("Failed to read stored metadata")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(info)))
}
