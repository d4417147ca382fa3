//! Factory: build the `AuthorizationGate` from application `Config`.
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AuthStrategy, Config};
use crate::services::auth::{
    AuthorizationGate,
    exchange::{ExchangeResolver, ExchangeSettings},
    group_claims::GroupClaimsResolver,
    key_provider::{KeyError, KeyProvider, PemKeyProvider},
    resolver::PermissionResolver,
    verifier::{TokenVerifier, VerifierSettings},
};

#[derive(Debug, Error)]
pub enum GateBuildError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("failed to build token exchange client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Load the verification key from `config.public_key_path` and wire the gate.
pub fn build_auth_gate(config: &Config) -> Result<Arc<AuthorizationGate>, GateBuildError> {
    let keys = PemKeyProvider::from_file(&config.public_key_path)?;
    build_auth_gate_with_keys(config, Arc::new(keys))
}

/// Same as `build_auth_gate` with the key supplied by the caller.
pub fn build_auth_gate_with_keys(
    config: &Config,
    keys: Arc<dyn KeyProvider>,
) -> Result<Arc<AuthorizationGate>, GateBuildError> {
    let verifier = Arc::new(TokenVerifier::new(
        keys,
        VerifierSettings {
            algorithm: config.token_algorithm,
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            leeway_seconds: config.access_token_leeway_seconds,
        },
    ));

    let resolver: Arc<dyn PermissionResolver> = match &config.auth_strategy {
        AuthStrategy::Claims => Arc::new(GroupClaimsResolver),
        AuthStrategy::Exchange {
            endpoint,
            audience,
            timeout,
        } => Arc::new(ExchangeResolver::new(
            verifier.clone(),
            ExchangeSettings {
                endpoint: endpoint.clone(),
                audience: audience.clone(),
                timeout: *timeout,
            },
        )?),
    };

    Ok(Arc::new(AuthorizationGate::new(
        verifier,
        resolver,
        config.empty_permissions,
    )))
}
