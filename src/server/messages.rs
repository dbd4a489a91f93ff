use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::context::SyncContext;
use crate::server::dto::{InboundMessage, UpdateAccepted};
use crate::server::response::{ApiError, ApiResponse};

pub async fn post_message(
    State(ctx): State<Arc<SyncContext>>,
    Json(message): Json<InboundMessage>,
) -> Result<axum::response::Response, ApiError> {
    match message {
        InboundMessage::GetTagData => {
            // The slot is claimed here so concurrent requests agree on who started.
            let run = ctx.begin_update();
            let started = run.is_some();
            let status = ctx.status().current();

            if let Some(run) = run {
                let ctx = ctx.clone();
                // Errors are already logged and published on the status channel.
                tokio::spawn(async move {
                    let _ = ctx.run_update(run).await;
                });
            }

            let body = UpdateAccepted { started, status };
            Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(body))).into_response())
        }
        InboundMessage::CheckVersion => {
            let result = ctx.check_version().await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
    }
}
