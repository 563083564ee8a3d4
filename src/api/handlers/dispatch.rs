use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::event::EchoedEvent;
use crate::config::DispatcherConfig;
use crate::dispatch::{
    AssessmentRequest, EndpointDirectory, ForwardedCredentials, JobLauncher, JobPayload,
};

#[derive(Clone)]
pub struct DispatchState {
    pub config: DispatcherConfig,
    pub directory: Arc<dyn EndpointDirectory>,
    pub launcher: Arc<dyn JobLauncher>,
}

impl DispatchState {
    pub fn new(
        config: DispatcherConfig,
        directory: Arc<dyn EndpointDirectory>,
        launcher: Arc<dyn JobLauncher>,
    ) -> Self {
        Self {
            config,
            directory,
            launcher,
        }
    }
}

/// POST /assessment
///
/// Queues the agents function for this user and echoes the request back.
/// Everything is validated before any AWS call, so a rejected request never
/// starts a job.
#[tracing::instrument(
    skip(state, headers, body),
    fields(
        method = %method,
        path = %uri.path(),
        function = %state.config.downstream_function
    )
)]
pub async fn dispatch_assessment(
    State(state): State<DispatchState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<EchoedEvent>> {
    info!("Processing assessment dispatch");

    // 1. Extract inputs
    let credentials = ForwardedCredentials::from_headers(&headers)?;
    let request = AssessmentRequest::parse(&body)?;

    info!(user_id = %request.user_id, identity_id = %request.identity_id, "Assessment request accepted");

    // 2. Resolve where the agents should report to
    let url = state
        .directory
        .graphql_endpoint(&state.config.graphql_api_id)
        .await?;

    // 3. Queue the job; its outcome is never observed here
    let payload = JobPayload::new(credentials, request, url);
    state
        .launcher
        .launch(&state.config.downstream_function, &payload)
        .await?;

    // 4. Echo the original event
    Ok(Json(EchoedEvent::from_parts(&method, &uri, &headers, &body)))
}
