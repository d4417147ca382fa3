use uuid::Uuid;

use crate::error::AppError;

pub mod health;
pub mod list_nodes;
pub mod projects;

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("INVALID_ID", "invalid id"))
}

fn denied(subject: &str, action: &'static str) -> AppError {
    tracing::warn!(subject = %subject, action, "access denied");
    AppError::Unauthorized
}
