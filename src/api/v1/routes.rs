/*
 * Responsibility
 * - v1 URL layout
 * - Everything here sits behind the access middleware (applied in app.rs)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    list_nodes::{create_list_node, get_list_node},
    projects::{create_project, delete_project, get_project, list_projects, update_project},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/listnodes", post(create_list_node))
        .route("/listnodes/{id}", get(get_list_node))
}
