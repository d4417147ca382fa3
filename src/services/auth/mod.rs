pub mod claims;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod gate;
pub mod group_claims;
pub mod key_provider;
pub mod resolver;
pub mod verifier;

pub use error::AuthError;
pub use exchange::AccessDetails;
pub use factory::{build_auth_gate, build_auth_gate_with_keys};
pub use gate::{AuthorizationGate, EmptyPermissions, require_project_admin, require_role};
pub use group_claims::UserInfo;
pub use resolver::Authorization;
