/*
 * Responsibility
 * - Read settings from the environment (.env supported via dotenvy)
 * - Validate them up front; a bad value fails startup, never a request
 */
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::services::auth::gate::EmptyPermissions;

pub const DEFAULT_PUBLIC_KEY_PATH: &str = "config/realm_key.rsa.pub";
pub const DEFAULT_EXCHANGE_AUDIENCE: &str = "projects-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How permissions are derived once a token is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Parse `groups` / `roles` claims from the token itself.
    Claims,
    /// Exchange the token for permission scopes at the authorization server.
    Exchange {
        endpoint: Url,
        audience: String,
        timeout: Duration,
    },
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub public_key_path: PathBuf,
    pub token_algorithm: Algorithm,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub auth_strategy: AuthStrategy,
    pub empty_permissions: EmptyPermissions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(vars, key);

        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let public_key_path =
            PathBuf::from(var("AUTH_PUBLIC_KEY_PATH").unwrap_or(DEFAULT_PUBLIC_KEY_PATH));

        let token_algorithm = match var("AUTH_ALGORITHM") {
            Some(raw) => parse_rsa_algorithm(raw).ok_or(ConfigError::Invalid("AUTH_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let auth_issuer = var("AUTH_ISSUER").map(str::to_string);
        let auth_audience = var("AUTH_AUDIENCE").map(str::to_string);

        let access_token_leeway_seconds = match var("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            // No clock skew allowance unless asked for: a past `exp` is expired.
            None => 0,
        };

        let auth_strategy = match var("AUTH_STRATEGY")
            .unwrap_or("claims")
            .to_ascii_lowercase()
            .as_str()
        {
            "claims" => AuthStrategy::Claims,
            "exchange" => {
                let endpoint = var("TOKEN_EXCHANGE_URL")
                    .ok_or(ConfigError::Missing("TOKEN_EXCHANGE_URL"))?;
                let endpoint =
                    Url::parse(endpoint).map_err(|_| ConfigError::Invalid("TOKEN_EXCHANGE_URL"))?;

                let audience = var("TOKEN_EXCHANGE_AUDIENCE")
                    .unwrap_or(DEFAULT_EXCHANGE_AUDIENCE)
                    .to_string();

                let timeout_seconds = match var("TOKEN_EXCHANGE_TIMEOUT_SECONDS") {
                    Some(raw) => raw
                        .parse::<u64>()
                        .ok()
                        .filter(|s| *s > 0)
                        .ok_or(ConfigError::Invalid("TOKEN_EXCHANGE_TIMEOUT_SECONDS"))?,
                    None => 5,
                };

                AuthStrategy::Exchange {
                    endpoint,
                    audience,
                    timeout: Duration::from_secs(timeout_seconds),
                }
            }
            _ => return Err(ConfigError::Invalid("AUTH_STRATEGY")),
        };

        let empty_permissions = match var("EMPTY_PERMISSIONS")
            .unwrap_or("allow")
            .to_ascii_lowercase()
            .as_str()
        {
            "allow" => EmptyPermissions::Allow,
            "deny" => EmptyPermissions::Deny,
            _ => return Err(ConfigError::Invalid("EMPTY_PERMISSIONS")),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            public_key_path,
            token_algorithm,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            auth_strategy,
            empty_permissions,
        })
    }
}

// Blank values count as unset.
fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

// Only RSA signature schemes are acceptable for realm tokens.
fn parse_rsa_algorithm(raw: &str) -> Option<Algorithm> {
    match raw {
        "RS256" => Some(Algorithm::RS256),
        "RS384" => Some(Algorithm::RS384),
        "RS512" => Some(Algorithm::RS512),
        "PS256" => Some(Algorithm::PS256),
        "PS384" => Some(Algorithm::PS384),
        "PS512" => Some(Algorithm::PS512),
        _ => None,
    }
}
