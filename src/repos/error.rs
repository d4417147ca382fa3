/*
 * Responsibility
 * - What a repo tells the layers above when a row cannot be used
 */
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("not found")]
    NotFound,

    /// The row exists but has been soft-deleted.
    #[error("has been deleted")]
    Deleted,
}
