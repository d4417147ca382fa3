#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use admin_api::config::Config;
use admin_api::services::auth::{
    AuthorizationGate, build_auth_gate_with_keys, key_provider::PemKeyProvider,
};
use axum::http::{HeaderMap, HeaderValue, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const REALM_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/realm_key.pem");
pub const REALM_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/realm_key.rsa.pub");
pub const FOREIGN_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/foreign_key.pem");

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims for `sub` valid for the next ten minutes, with group paths.
pub fn user_claims(sub: &str, groups: &[&str]) -> Value {
    json!({
        "sub": sub,
        "iat": now(),
        "exp": now() + 600,
        "groups": groups,
        "roles": ["offline_access"],
    })
}

pub fn sign_with(private_key: &[u8], claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(private_key).expect("fixture key");
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).expect("sign")
}

/// Signed by the realm key the gate trusts.
pub fn sign(claims: &Value) -> String {
    sign_with(REALM_PRIVATE_KEY, claims)
}

/// `alg: none` with an empty signature segment.
pub fn unsigned(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}

/// HMAC with the public key bytes as secret (the classic key confusion attack).
pub fn hmac_signed(claims: &Value) -> String {
    let key = EncodingKey::from_secret(REALM_PUBLIC_KEY);
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key).expect("sign")
}

pub fn config(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_vars(&vars).expect("test config")
}

pub fn gate(config: &Config) -> Arc<AuthorizationGate> {
    let keys = PemKeyProvider::from_pem(REALM_PUBLIC_KEY).expect("fixture public key");
    build_auth_gate_with_keys(config, Arc::new(keys)).expect("gate")
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}
