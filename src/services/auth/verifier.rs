//! Bearer token verification.
//!
//! Turns a raw bearer string into `VerifiedClaims`. This is pure
//! verification: signature, algorithm and time bounds. No network I/O and no
//! authorization decisions happen here.

use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::services::auth::{error::AuthError, key_provider::KeyProvider};

/// Tokens larger than this are rejected before any decoding.
pub const MAX_TOKEN_BYTES: usize = 8192;

/// Decoded payload of a token whose algorithm, signature and time bounds
/// have been checked.
///
/// Only `TokenVerifier::verify` can build one.
#[derive(Clone)]
pub struct VerifiedClaims {
    claims: Map<String, Value>,
    expires_at: Option<i64>,
    issued_at: Option<i64>,
}

impl fmt::Debug for VerifiedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedClaims")
            .field("claims", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl VerifiedClaims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.issued_at
    }

    #[cfg(test)]
    pub(crate) fn for_tests(claims: Value) -> Self {
        let claims = match claims {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            expires_at: claims.get("exp").and_then(Value::as_i64),
            issued_at: claims.get("iat").and_then(Value::as_i64),
            claims,
        }
    }
}

/// Knobs for `TokenVerifier`.
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub algorithm: Algorithm,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RS256,
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        }
    }
}

#[derive(Deserialize)]
struct UnverifiedHeader {
    alg: String,
}

pub struct TokenVerifier {
    keys: Arc<dyn KeyProvider>,
    algorithm: Algorithm,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.algorithm)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeyProvider>, settings: VerifierSettings) -> Self {
        let mut validation = Validation::new(settings.algorithm);
        validation.leeway = settings.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);

        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            // Keycloak always sets `aud`; without pinning it must not be checked.
            None => validation.validate_aud = false,
        }

        Self {
            keys,
            algorithm: settings.algorithm,
            validation,
        }
    }

    /// Verify a raw bearer token.
    ///
    /// Order of checks:
    /// 1. shape (empty, whitespace, size, three segments)
    /// 2. declared `alg` equals the configured RSA algorithm, before any
    ///    key is touched
    /// 3. signature
    /// 4. `exp` / `nbf` (and `iss` / `aud` when pinned)
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        if token.is_empty()
            || token.len() > MAX_TOKEN_BYTES
            || token.chars().any(char::is_whitespace)
        {
            return Err(AuthError::MalformedToken);
        }

        let declared = declared_algorithm(token)?;
        match declared.parse::<Algorithm>() {
            Ok(alg) if alg == self.algorithm => {}
            _ => {
                tracing::debug!(alg = %declared, "rejected token signing algorithm");
                return Err(AuthError::UnsupportedAlgorithm);
            }
        }

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            self.keys.decoding_key(),
            &self.validation,
        )?;

        let claims = data.claims;
        Ok(VerifiedClaims {
            expires_at: claims.get("exp").and_then(Value::as_i64),
            issued_at: claims.get("iat").and_then(Value::as_i64),
            claims,
        })
    }
}

// Reads `alg` from the unverified header. A token signed with `none` has an
// empty third segment, so only header and payload must be non-empty here.
fn declared_algorithm(token: &str) -> Result<String, AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken);
    };
    if header.is_empty() || payload.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::MalformedToken)?;
    let header: UnverifiedHeader =
        serde_json::from_slice(&raw).map_err(|_| AuthError::MalformedToken)?;

    Ok(header.alg)
}
