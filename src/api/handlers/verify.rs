use axum::Json;
use tracing::debug;

use crate::auth::verifier::VERIFIED;

/// GET /verify-auth
///
/// Placeholder check: every invocation is answered with `"VERIFIED"`,
/// whatever the method, headers or body. Reaching this handler at all means
/// the gateway's authorizer already let the request through; the handler
/// itself enforces nothing.
pub async fn verify_auth() -> Json<&'static str> {
    debug!("Answering auth verification");
    Json(VERIFIED)
}
