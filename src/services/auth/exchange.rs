//! Exchange strategy: trade the caller's token for its permission scopes.
//!
//! The caller's bearer token is forwarded to the authorization server's
//! token endpoint as an UMA ticket grant with `response_mode=permissions`.
//! The server answers with one record per resource; their scopes are
//! flattened into `AccessDetails::permissions`.
//!
//! Failure policy: nothing here grants access on error. Transport problems
//! surface as `UpstreamUnavailable`, anything the server says that is not a
//! 2xx permission list (or one larger than `MAX_EXCHANGE_RESPONSE_BYTES`) as
//! `PermissionLookupFailed`. No retries.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use tracing::{error, instrument, warn};
use url::Url;

use crate::services::auth::{
    claims::{ClaimRequirements, RawIdentity},
    error::AuthError,
    resolver::{Authorization, PermissionResolver},
    verifier::TokenVerifier,
};

pub const UMA_TICKET_GRANT: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

/// Permission lists larger than this are refused without being buffered.
pub const MAX_EXCHANGE_RESPONSE_BYTES: usize = 256 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDetails {
    pub user_id: String,
    /// Scope strings in the order the server listed them.
    pub permissions: Vec<String>,
}

impl AccessDetails {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// One entry of the `response_mode=permissions` answer.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionTicket {
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub rsid: Option<String>,
    #[serde(default)]
    pub rsname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExchangeSettings {
    pub endpoint: Url,
    pub audience: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ExchangeResolver {
    client: Client,
    verifier: Arc<TokenVerifier>,
    endpoint: Url,
    audience: String,
}

impl ExchangeResolver {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        settings: ExchangeSettings,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            verifier,
            endpoint: settings.endpoint,
            audience: settings.audience,
        })
    }

    /// Look up the permissions granted to `subject`.
    ///
    /// The token is re-verified first so a token that expired since the gate
    /// checked it is never forwarded.
    #[instrument(skip_all, fields(subject = %subject))]
    pub async fn resolve_permissions(
        &self,
        token: &str,
        subject: &str,
    ) -> Result<AccessDetails, AuthError> {
        self.verifier.verify(token)?;

        let form = [
            ("grant_type", UMA_TICKET_GRANT),
            ("audience", self.audience.as_str()),
            ("response_mode", "permissions"),
        ];

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout = e.is_timeout(), "token exchange request failed");
                AuthError::UpstreamUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "token exchange rejected");
            return Err(AuthError::PermissionLookupFailed);
        }

        let body = read_capped(response).await?;

        let tickets: Vec<PermissionTicket> = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "unparsable token exchange response");
            AuthError::PermissionLookupFailed
        })?;

        Ok(AccessDetails {
            user_id: subject.to_string(),
            permissions: flatten_scopes(tickets),
        })
    }
}

// Read the body chunk by chunk, giving up once it outgrows the cap.
async fn read_capped(mut response: reqwest::Response) -> Result<Vec<u8>, AuthError> {
    if let Some(len) = response.content_length()
        && len > MAX_EXCHANGE_RESPONSE_BYTES as u64
    {
        warn!(length = len, "token exchange response too large");
        return Err(AuthError::PermissionLookupFailed);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| {
        error!(error = %e, "failed to read token exchange response");
        AuthError::UpstreamUnavailable
    })? {
        if body.len() + chunk.len() > MAX_EXCHANGE_RESPONSE_BYTES {
            warn!("token exchange response too large");
            return Err(AuthError::PermissionLookupFailed);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

fn flatten_scopes(tickets: Vec<PermissionTicket>) -> Vec<String> {
    tickets.into_iter().flat_map(|t| t.scopes).collect()
}

#[async_trait]
impl PermissionResolver for ExchangeResolver {
    fn requirements(&self) -> ClaimRequirements {
        ClaimRequirements::SubjectOnly
    }

    async fn resolve(
        &self,
        token: &str,
        identity: RawIdentity,
    ) -> Result<Authorization, AuthError> {
        let details = self.resolve_permissions(token, &identity.subject).await?;
        Ok(Authorization::Access(details))
    }
}
