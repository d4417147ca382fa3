use thiserror::Error;

/// Why an authorization attempt failed.
///
/// Every variant is terminal for the current attempt. Handlers map them to
/// HTTP responses through `AppError`; the variant itself never reaches the
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("malformed bearer token")]
    MalformedToken,

    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired or not yet valid")]
    Expired,

    #[error("missing 'sub' claim")]
    MissingSubject,

    #[error("missing '{0}' claim")]
    MissingClaim(&'static str),

    #[error("invalid '{0}' claim")]
    InvalidClaim(&'static str),

    #[error("token exchange endpoint unavailable")]
    UpstreamUnavailable,

    #[error("permission lookup failed")]
    PermissionLookupFailed,

    #[error("no permissions granted")]
    NoPermissions,
}

impl AuthError {
    /// `true` when the failure comes from infrastructure rather than the
    /// caller's credentials.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable)
    }

    /// Stable, low-cardinality name used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::MissingSubject => "missing_subject",
            Self::MissingClaim(_) => "missing_claim",
            Self::InvalidClaim(_) => "invalid_claim",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::PermissionLookupFailed => "permission_lookup_failed",
            Self::NoPermissions => "no_permissions",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::MalformedToken,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm
            }
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::InvalidClaim("iss"),
            ErrorKind::InvalidAudience => Self::InvalidClaim("aud"),
            ErrorKind::InvalidSubject => Self::InvalidClaim("sub"),
            ErrorKind::MissingRequiredClaim(name) => Self::MissingClaim(registered_claim(name)),
            // Key/crypto failures and anything added upstream fail closed.
            _ => Self::InvalidSignature,
        }
    }
}

// Only registered claims can be required by `Validation`.
fn registered_claim(name: &str) -> &'static str {
    match name {
        "exp" => "exp",
        "nbf" => "nbf",
        "iss" => "iss",
        "aud" => "aud",
        "sub" => "sub",
        _ => "unknown",
    }
}
