//! Permission resolution strategies.
//!
//! Two strategies exist and one is picked at startup from configuration:
//! - `ExchangeResolver` asks the authorization server for the caller's
//!   permission scopes (UMA ticket exchange).
//! - `GroupClaimsResolver` derives admin flags from group paths embedded in
//!   the token.

use async_trait::async_trait;

use crate::services::auth::{
    claims::{ClaimRequirements, RawIdentity},
    error::AuthError,
    exchange::AccessDetails,
    group_claims::UserInfo,
};

/// Result of a successful authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    User(UserInfo),
    Access(AccessDetails),
}

impl Authorization {
    pub fn user_id(&self) -> &str {
        match self {
            Self::User(info) => &info.user_id,
            Self::Access(details) => &details.user_id,
        }
    }
}

#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Claims the extractor must enforce before `resolve` is called.
    fn requirements(&self) -> ClaimRequirements;

    /// `token` is the raw bearer string, already verified once by the gate.
    async fn resolve(&self, token: &str, identity: RawIdentity)
    -> Result<Authorization, AuthError>;
}
