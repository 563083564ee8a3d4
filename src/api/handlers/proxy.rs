use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::ApiResult;
use crate::auth::{is_verified_body, AuthVerifier};

pub const PASSED: &str = "VERIFIED AND PASSED";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

#[derive(Clone)]
pub struct ProxyState {
    pub verifier: Arc<dyn AuthVerifier>,
}

impl ProxyState {
    pub fn new(verifier: Arc<dyn AuthVerifier>) -> Self {
        Self { verifier }
    }
}

fn unauthorized() -> (StatusCode, Json<&'static str>) {
    (StatusCode::UNAUTHORIZED, Json(UNAUTHORIZED))
}

/// Gate a request on AuthVerify's answer for its bearer token.
///
/// Only an upstream body of exactly `VERIFIED` passes. A transport failure
/// is an error (502), not a rejection.
#[tracing::instrument(skip(state, headers))]
pub async fn gated_proxy(
    State(state): State<ProxyState>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<&'static str>)> {
    let Some(authorization) = headers.get("Authorization").and_then(|h| h.to_str().ok()) else {
        warn!("Missing Authorization header, rejecting without upstream call");
        return Ok(unauthorized());
    };

    let body = state.verifier.verify(authorization).await?;

    if is_verified_body(&body) {
        info!("Token verified upstream");
        Ok((StatusCode::OK, Json(PASSED)))
    } else {
        info!("Token rejected upstream");
        Ok(unauthorized())
    }
}
