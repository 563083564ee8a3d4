use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use super::DispatchError;

pub const AUTHORIZATION: &str = "Authorization";
pub const ACCESS_KEY: &str = "X-Access-Key";
pub const SECRET_KEY: &str = "X-Secret-Key";
pub const SESSION_TOKEN: &str = "X-Session-Token";

/// Caller credentials relayed untouched to the agents function
#[derive(Clone, PartialEq)]
pub struct ForwardedCredentials {
    pub authorization: String,
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
}

// Keep secrets out of logs and panic messages
impl std::fmt::Debug for ForwardedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardedCredentials")
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

impl ForwardedCredentials {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, DispatchError> {
        Ok(Self {
            authorization: required_header(headers, AUTHORIZATION)?,
            access_key: required_header(headers, ACCESS_KEY)?,
            secret_key: required_header(headers, SECRET_KEY)?,
            session_token: required_header(headers, SESSION_TOKEN)?,
        })
    }
}

fn required_header(headers: &HeaderMap, name: &'static str) -> Result<String, DispatchError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(DispatchError::MissingField(name))
}

/// Body of an assessment request.
///
/// The ids are opaque to the gateway: any non-null JSON value is accepted and
/// handed to the agents function exactly as received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssessmentRequest {
    pub user_id: serde_json::Value,
    pub identity_id: serde_json::Value,
}

impl AssessmentRequest {
    pub fn parse(body: &[u8]) -> Result<Self, DispatchError> {
        if body.is_empty() {
            return Err(DispatchError::MissingField("body"));
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| DispatchError::InvalidBody(e.to_string()))?;

        // Report absent keys by name rather than as a serde message
        for field in ["user_id", "identity_id"] {
            if value.get(field).map_or(true, |v| v.is_null()) {
                return Err(DispatchError::MissingField(field));
            }
        }

        serde_json::from_value(value).map_err(|e| DispatchError::InvalidBody(e.to_string()))
    }
}

/// Event sent to the agents function; key names are what it reads
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub auth: String,
    pub user_id: serde_json::Value,
    pub identity_id: serde_json::Value,
    pub url: String,
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
}

impl std::fmt::Debug for JobPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPayload")
            .field("user_id", &self.user_id)
            .field("identity_id", &self.identity_id)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl JobPayload {
    pub fn new(credentials: ForwardedCredentials, request: AssessmentRequest, url: String) -> Self {
        Self {
            auth: credentials.authorization,
            user_id: request.user_id,
            identity_id: request.identity_id,
            url,
            access_key: credentials.access_key,
            secret_key: credentials.secret_key,
            session_token: credentials.session_token,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DispatchError> {
        serde_json::to_vec(self).map_err(|e| DispatchError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn full_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer id-token"));
        headers.insert("x-access-key", HeaderValue::from_static("AKIAEXAMPLE"));
        headers.insert("x-secret-key", HeaderValue::from_static("secret"));
        headers.insert("x-session-token", HeaderValue::from_static("session"));
        headers
    }

    #[test]
    fn test_credentials_from_headers() {
        let creds = ForwardedCredentials::from_headers(&full_headers()).unwrap();
        assert_eq!(creds.authorization, "Bearer id-token");
        assert_eq!(creds.session_token, "session");
    }

    #[test]
    fn test_each_header_is_required() {
        for name in ["authorization", "x-access-key", "x-secret-key", "x-session-token"] {
            let mut headers = full_headers();
            headers.remove(name);
            match ForwardedCredentials::from_headers(&headers) {
                Err(DispatchError::MissingField(field)) => {
                    assert_eq!(field.to_ascii_lowercase(), name)
                }
                other => panic!("Expected MissingField for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = ForwardedCredentials::from_headers(&full_headers()).unwrap();
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("id-token"));
    }

    #[test]
    fn test_parse_assessment_request() {
        let req = AssessmentRequest::parse(
            br#"{"user_id": "u-1", "identity_id": "us-east-1:abc", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, "u-1");
        assert_eq!(req.identity_id, "us-east-1:abc");
    }

    #[test]
    fn test_parse_missing_identity_id() {
        let result = AssessmentRequest::parse(br#"{"user_id": "u-1"}"#);
        assert!(matches!(result, Err(DispatchError::MissingField("identity_id"))));
    }

    #[test]
    fn test_parse_keeps_non_string_ids() {
        let req =
            AssessmentRequest::parse(br#"{"user_id": 42, "identity_id": {"pool": "eu"}}"#).unwrap();
        assert_eq!(req.user_id, 42);
        assert_eq!(req.identity_id["pool"], "eu");
    }

    #[test]
    fn test_parse_null_id_is_missing() {
        let result = AssessmentRequest::parse(br#"{"user_id": null, "identity_id": "x"}"#);
        assert!(matches!(result, Err(DispatchError::MissingField("user_id"))));
    }

    #[test]
    fn test_parse_empty_and_garbage_bodies() {
        assert!(matches!(
            AssessmentRequest::parse(b""),
            Err(DispatchError::MissingField("body"))
        ));
        assert!(matches!(
            AssessmentRequest::parse(b"not json"),
            Err(DispatchError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_payload_field_names() {
        let creds = ForwardedCredentials::from_headers(&full_headers()).unwrap();
        let request = AssessmentRequest {
            user_id: serde_json::json!("u-1"),
            identity_id: serde_json::json!("i-1"),
        };
        let payload = JobPayload::new(creds, request, "https://gql.example/graphql".to_string());

        let json: serde_json::Value = serde_json::from_slice(&payload.to_bytes().unwrap()).unwrap();
        assert_eq!(json["auth"], "Bearer id-token");
        assert_eq!(json["user_id"], "u-1");
        assert_eq!(json["identity_id"], "i-1");
        assert_eq!(json["url"], "https://gql.example/graphql");
        assert_eq!(json["access_key"], "AKIAEXAMPLE");
        assert_eq!(json["secret_key"], "secret");
        assert_eq!(json["session_token"], "session");
        assert_eq!(json.as_object().unwrap().len(), 7);
    }
}
