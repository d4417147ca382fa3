/*
 * Responsibility
 * - GET /api/v1/health: reachable only with a valid token, so it doubles as
 *   a "what does my token grant" probe. The unauthenticated probe is GET /health.
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Authorization;

pub async fn health(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Value> {
    let grants = match ctx.authorization() {
        Authorization::User(info) => json!({
            "systemAdmin": info.is_system_admin,
            "projectAdmin": info.is_project_admin,
            "projects": info.projects,
        }),
        Authorization::Access(details) => json!({
            "permissions": details.permissions,
        }),
    };

    Json(json!({
        "status": "ok",
        "subject": ctx.user_id(),
        "grants": grants,
    }))
}
