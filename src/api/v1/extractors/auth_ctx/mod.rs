/*!
 * Authorization context extractor
 *
 * Responsibility:
 * - Hand the authorized caller (AuthCtx) to handlers
 * - axum specifics live in core, the type and its policy in types
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::{AuthCtx, PERMISSION_READ, PERMISSION_WRITE};
