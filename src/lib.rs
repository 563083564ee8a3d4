pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod secrets;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ConfigError, DispatcherConfig, GatedProxyConfig, Settings};

pub use auth::{is_verified_body, AuthVerifier, HttpAuthVerifier, VerifyError};

pub use dispatch::{
    AppSyncDirectory, AssessmentRequest, DispatchError, EndpointDirectory,
    ForwardedCredentials, JobLauncher, JobPayload, LambdaJobLauncher,
};
