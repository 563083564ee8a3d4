pub mod verifier;

pub use verifier::{is_verified_body, AuthVerifier, HttpAuthVerifier, VerifyError};
