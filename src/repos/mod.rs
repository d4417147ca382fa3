pub mod error;
pub mod list_node_repo;
pub mod project_repo;

pub use error::RepoError;
pub use list_node_repo::ListNodeRepo;
pub use project_repo::ProjectRepo;
