/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap: everything inside is an Arc or Arc-backed
 */
use std::sync::Arc;

use crate::repos::{ListNodeRepo, ProjectRepo};
use crate::services::auth::AuthorizationGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AuthorizationGate>,
    pub projects: ProjectRepo,
    pub list_nodes: ListNodeRepo,
}

impl AppState {
    pub fn new(gate: Arc<AuthorizationGate>) -> Self {
        Self {
            gate,
            projects: ProjectRepo::new(),
            list_nodes: ListNodeRepo::new(),
        }
    }
}
