#![allow(dead_code)]

use agents_gateway::api::handlers::{DispatchState, ProxyState};
use agents_gateway::{
    AuthVerifier, DispatchError, DispatcherConfig, EndpointDirectory, JobLauncher, JobPayload,
    VerifyError,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use std::sync::{Arc, Mutex};

pub const GRAPHQL_URL: &str = "https://abc123.appsync-api.us-east-1.amazonaws.com/graphql";
pub const API_ID: &str = "abc123";
pub const FUNCTION: &str = "agents-part-1";

/// Directory fake that records lookups and answers with a fixed URL or error
pub struct FakeDirectory {
    pub lookups: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeDirectory {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            lookups: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            lookups: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl EndpointDirectory for FakeDirectory {
    async fn graphql_endpoint(&self, api_id: &str) -> Result<String, DispatchError> {
        self.lookups.lock().unwrap().push(api_id.to_string());
        if self.fail {
            return Err(DispatchError::Directory("NotFoundException".to_string()));
        }
        Ok(GRAPHQL_URL.to_string())
    }
}

/// Launcher fake that records every submitted job
pub struct FakeLauncher {
    pub launched: Mutex<Vec<(String, JobPayload)>>,
    pub fail: bool,
}

impl FakeLauncher {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            launched: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            launched: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn jobs(&self) -> Vec<(String, JobPayload)> {
        self.launched.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobLauncher for FakeLauncher {
    async fn launch(&self, function: &str, payload: &JobPayload) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Invoke("TooManyRequestsException".to_string()));
        }
        self.launched
            .lock()
            .unwrap()
            .push((function.to_string(), payload.clone()));
        Ok(())
    }
}

pub fn dispatch_state(directory: Arc<FakeDirectory>, launcher: Arc<FakeLauncher>) -> DispatchState {
    DispatchState::new(
        DispatcherConfig {
            graphql_api_id: API_ID.to_string(),
            downstream_function: FUNCTION.to_string(),
        },
        directory,
        launcher,
    )
}

/// Verifier fake answering with a canned body, recording forwarded headers
pub struct FakeVerifier {
    pub body: Option<String>,
    pub seen: Mutex<Vec<String>>,
}

impl FakeVerifier {
    pub fn answering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn forwarded(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthVerifier for FakeVerifier {
    async fn verify(&self, authorization: &str) -> Result<String, VerifyError> {
        self.seen.lock().unwrap().push(authorization.to_string());
        self.body
            .clone()
            .ok_or_else(|| VerifyError::Transport("connection refused".to_string()))
    }
}

pub fn proxy_state(verifier: Arc<FakeVerifier>) -> ProxyState {
    ProxyState::new(verifier)
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_cors(response: &Response<Body>) {
    for name in [
        "access-control-allow-origin",
        "access-control-allow-headers",
        "access-control-allow-methods",
    ] {
        assert_eq!(
            response.headers().get(name).and_then(|v| v.to_str().ok()),
            Some("*"),
            "missing or wrong {}",
            name
        );
    }
}

pub fn assessment_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/assessment")
        .header("Authorization", "Bearer id-token")
        .header("X-Access-Key", "AKIAEXAMPLE")
        .header("X-Secret-Key", "secret")
        .header("X-Session-Token", "session")
        .body(Body::from(body.to_string()))
        .unwrap()
}
