use async_trait::async_trait;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use tracing::{info, warn};

use super::{DispatchError, JobPayload};

/// Submits a job to run without waiting for it.
///
/// `launch` returns once the job is queued. There is no result channel: the
/// job's completion, output and failures are never reported back.
#[async_trait]
pub trait JobLauncher: Send + Sync {
    async fn launch(&self, function: &str, payload: &JobPayload) -> Result<(), DispatchError>;
}

/// Lambda `Invoke` with `InvocationType::Event`
#[derive(Clone)]
pub struct LambdaJobLauncher {
    client: aws_sdk_lambda::Client,
}

impl LambdaJobLauncher {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait]
impl JobLauncher for LambdaJobLauncher {
    #[tracing::instrument(skip(self, payload), fields(user_id = %payload.user_id))]
    async fn launch(&self, function: &str, payload: &JobPayload) -> Result<(), DispatchError> {
        let body = payload.to_bytes()?;

        let response = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to queue downstream invocation: {}", e);
                DispatchError::Invoke(e.to_string())
            })?;

        // Lambda answers 202 once the event is queued
        info!(status = response.status_code(), "Downstream invocation queued");
        Ok(())
    }
}
