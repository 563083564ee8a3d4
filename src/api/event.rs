use axum::{
    extract::Query,
    http::{HeaderMap, Method, Uri},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The incoming request, rebuilt in API Gateway proxy-event shape so the
/// assessment endpoint can hand it back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoedEvent {
    pub http_method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    pub body: Option<String>,
}

impl EchoedEvent {
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let query_string_parameters = uri
            .query()
            .and_then(|_| Query::<HashMap<String, String>>::try_from_uri(uri).ok())
            .map(|Query(params)| params.into_iter().collect());

        Self {
            http_method: method.to_string(),
            path: uri.path().to_string(),
            headers: flatten_headers(headers),
            query_string_parameters,
            body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        }
    }
}

/// Repeated headers are joined with ", "; non-UTF8 values are dropped
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else { continue };
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    flat
}
