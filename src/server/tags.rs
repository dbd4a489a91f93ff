use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::context::SyncContext;
use crate::server::dto::{LookupResponse, SuggestParams};
use crate::server::response::{ApiError, ApiResponse, OptionExt};

pub async fn suggest_tags(
    State(ctx): State<Arc<SyncContext>>,
    Query(params): Query<SuggestParams>,
) -> impl IntoResponse {
    if params.q.trim().is_empty() {
        return Err(ApiError::bad_request("Query cannot be empty"));
    }

    let tags = ctx.suggest(&params.q, params.limit());
    Ok::<_, ApiError>(Json(ApiResponse::success(tags)))
}

pub async fn lookup_tag(
    State(ctx): State<Arc<SyncContext>>,
    Path(tag): Path<String>,
) -> impl IntoResponse {
    let name = ctx.lookup(&tag).or_not_found("Tag not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(LookupResponse { tag, name })))
}
