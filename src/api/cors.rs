use axum::{
    http::{header, HeaderValue, StatusCode},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

fn any() -> HeaderValue {
    HeaderValue::from_static("*")
}

/// Stamp the permissive CORS headers (`*` origin, headers and methods) on
/// every response the router produces, replacing any set by handlers.
pub fn with_cors<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            any(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            any(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            any(),
        ))
}

/// OPTIONS preflight; the headers come from `with_cors`
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
