// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract headers and body from the request
// 2. Call the verifier / dispatch services held in state
// 3. Transform the result into an HTTP response

pub mod dispatch;
pub mod proxy;
pub mod verify;

pub use dispatch::{dispatch_assessment, DispatchState};
pub use proxy::{gated_proxy, ProxyState};
pub use verify::verify_auth;
