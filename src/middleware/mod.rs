/*
 * Responsibility
 * - Public interface of the middleware layer
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
