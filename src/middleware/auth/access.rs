//! Run the authorization gate and hand its result to handlers.
//!
//! Every request under `/api/v1/*` goes through `AuthorizationGate::authorize`
//! exactly once. On success the `Authorization` is wrapped in an `AuthCtx` and
//! stored in request extensions; handlers read it with `AuthCtxExtractor`.
//! On failure the request ends here with a generic body.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Apply authorization to every route of `router`.
///
/// ```ignore
/// let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let result = state.gate.authorize(req.headers()).await;
    let authorization = match result {
        Ok(authorization) => authorization,
        Err(err) if err.is_infrastructure() => {
            tracing::error!(reason = err.kind(), "authorization unavailable");
            return Err(err.into());
        }
        Err(err) => {
            tracing::warn!(reason = err.kind(), "authorization failed");
            return Err(err.into());
        }
    };

    req.extensions_mut().insert(AuthCtx::new(authorization));

    Ok(next.run(req).await)
}
