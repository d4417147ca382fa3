/*
 * Responsibility
 * - /projects CRUD handlers
 * - Verb-level authorization through AuthCtx before touching the repo
 * - The caller's subject is recorded as creator / changer / deleter
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::projects::{
            CreateProjectRequest, ListProjectsQuery, ProjectResponse, UpdateProjectRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

use super::{denied, parse_id};

pub async fn list_projects(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    if !ctx.can_read() {
        return Err(denied(ctx.user_id(), "list_projects"));
    }

    let rows = state.projects.list(query.return_deleted_projects).await;
    Ok(Json(rows.into_iter().map(ProjectResponse::from).collect()))
}

pub async fn create_project(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    if !ctx.can_create() {
        return Err(denied(ctx.user_id(), "create_project"));
    }
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let row = state
        .projects
        .create(req.into_new_project(ctx.user_id()))
        .await;
    tracing::info!(project = %row.id, subject = %ctx.user_id(), "project created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_project(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    if !ctx.can_read() {
        return Err(denied(ctx.user_id(), "get_project"));
    }
    let id = parse_id(&id)?;

    let row = state.projects.get(id).await?;
    Ok(Json(row.into()))
}

pub async fn update_project(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    // Group paths carry the canonical (hyphenated lowercase) form.
    let id = parse_id(&id)?;
    if !ctx.can_modify_project(&id.to_string()) {
        return Err(denied(ctx.user_id(), "update_project"));
    }

    let row = state
        .projects
        .update(id, req.into_changes(), ctx.user_id())
        .await?;

    Ok(Json(row.into()))
}

pub async fn delete_project(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let id = parse_id(&id)?;
    if !ctx.can_modify_project(&id.to_string()) {
        return Err(denied(ctx.user_id(), "delete_project"));
    }

    let row = state.projects.delete(id, ctx.user_id()).await?;
    tracing::info!(project = %id, subject = %ctx.user_id(), "project deleted");

    Ok(Json(row.into()))
}
