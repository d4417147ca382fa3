pub mod list_nodes;
pub mod projects;
