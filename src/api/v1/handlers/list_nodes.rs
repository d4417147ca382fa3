use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::list_nodes::{CreateListNodeRequest, ListNodeResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

use super::{denied, parse_id};

pub async fn create_list_node(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateListNodeRequest>,
) -> Result<(StatusCode, Json<ListNodeResponse>), AppError> {
    if !ctx.can_create() {
        return Err(denied(ctx.user_id(), "create_list_node"));
    }
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let row = state
        .list_nodes
        .create(&req.name, &req.label, req.comment.as_deref().unwrap_or(""))
        .await;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_list_node(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<Json<ListNodeResponse>, AppError> {
    if !ctx.can_read() {
        return Err(denied(ctx.user_id(), "get_list_node"));
    }
    let id = parse_id(&id)?;

    let row = state
        .list_nodes
        .get(id)
        .await
        .ok_or(AppError::not_found("list node"))?;

    Ok(Json(row.into()))
}
