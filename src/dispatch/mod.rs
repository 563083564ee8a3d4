// Dispatch layer - resolves where the agents should write and queues them.
// No HTTP concerns here; the assessment handler maps these errors to responses.

pub mod directory;
pub mod launcher;
pub mod payload;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("GraphQL endpoint lookup failed: {0}")]
    Directory(String),

    #[error("Downstream invocation failed: {0}")]
    Invoke(String),
}

pub use directory::{AppSyncDirectory, EndpointDirectory};
pub use launcher::{JobLauncher, LambdaJobLauncher};
pub use payload::{AssessmentRequest, ForwardedCredentials, JobPayload};
