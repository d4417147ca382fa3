//! Verification key material.
//!
//! The realm's RSA public key is read once at startup and is immutable for
//! the lifetime of the process. Callers depend on the `KeyProvider` trait so
//! key rotation can be added later without touching the verifier.

use std::{fmt, fs, path::Path};

use jsonwebtoken::DecodingKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read public key {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RSA public key pem: {0}")]
    Parse(#[from] jsonwebtoken::errors::Error),
}

/// Source of the key used to verify bearer token signatures.
pub trait KeyProvider: Send + Sync {
    fn decoding_key(&self) -> &DecodingKey;
}

/// PEM-encoded RSA public key loaded from disk (or from memory in tests).
#[derive(Clone)]
pub struct PemKeyProvider {
    key: DecodingKey,
}

impl fmt::Debug for PemKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("PemKeyProvider").finish_non_exhaustive()
    }
}

impl PemKeyProvider {
    /// Accepts both `PUBLIC KEY` (SPKI) and `RSA PUBLIC KEY` (PKCS#1) blocks.
    pub fn from_pem(pem: &[u8]) -> Result<Self, KeyError> {
        let key = DecodingKey::from_rsa_pem(pem)?;
        Ok(Self { key })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem = fs::read(path).map_err(|source| KeyError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_pem(&pem)
    }
}

impl KeyProvider for PemKeyProvider {
    fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}
