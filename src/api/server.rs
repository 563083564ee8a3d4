use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::cors::{preflight, with_cors};
use crate::api::handlers::{dispatch_assessment, gated_proxy, verify_auth, DispatchState, ProxyState};
use crate::auth::HttpAuthVerifier;
use crate::config::{self, Settings};
use crate::dispatch::{AppSyncDirectory, LambdaJobLauncher};
use crate::secrets::load_secret_overrides;
use crate::telemetry::{init_tracing, is_lambda};

/// Cold-start initialisation shared by every binary: local `.env`, logging,
/// then settings from the environment with the Secrets Manager overlay.
pub async fn bootstrap() -> anyhow::Result<Settings> {
    let dotenv = if is_lambda() {
        None
    } else {
        config::load_dotenv()
    };
    init_tracing();

    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let overrides = load_secret_overrides().await?;
    let settings = Settings::from_env()?.with_overrides(&overrides)?;

    Ok(settings)
}

/// AuthVerify as its own function: every path and method gets `"VERIFIED"`
pub fn verify_app() -> Router {
    with_cors(Router::new().fallback(verify_auth)).layer(TraceLayer::new_for_http())
}

/// Dispatcher as its own function: POST on any path
pub fn dispatch_app(state: DispatchState) -> Router {
    let router = Router::new()
        .fallback(post(dispatch_assessment).options(preflight))
        .with_state(state);

    with_cors(router).layer(TraceLayer::new_for_http())
}

/// GatedProxy as its own function: any path, any method
pub fn gated_proxy_app(state: ProxyState) -> Router {
    let router = Router::new()
        .fallback(any(gated_proxy).options(preflight))
        .with_state(state);

    with_cors(router).layer(TraceLayer::new_for_http())
}

pub async fn dispatch_state(settings: &Settings) -> anyhow::Result<DispatchState> {
    let dispatcher = settings.dispatcher()?;
    let sdk_config = aws_config::load_from_env().await;

    Ok(DispatchState::new(
        dispatcher,
        Arc::new(AppSyncDirectory::new(&sdk_config)),
        Arc::new(LambdaJobLauncher::new(&sdk_config)),
    ))
}

pub fn proxy_state(settings: &Settings) -> anyhow::Result<ProxyState> {
    let verifier = HttpAuthVerifier::new(&settings.gated_proxy()?)?;
    Ok(ProxyState::new(Arc::new(verifier)))
}

/// All three handlers on one router, mirroring the deployed REST API paths.
///
/// Handlers whose settings are missing are left out so a partial `.env`
/// still gives a usable local server.
pub fn create_app(dispatch: Option<DispatchState>, proxy: Option<ProxyState>) -> Router {
    let mut router = Router::new()
        .route("/verify-auth", get(verify_auth).options(preflight))
        .route("/health", get(health_check));

    match dispatch {
        Some(state) => {
            // The deployed REST resource is spelled "assesment"
            let assessment = Router::new()
                .route("/assessment", post(dispatch_assessment).options(preflight))
                .route("/assesment", post(dispatch_assessment).options(preflight))
                .with_state(state);
            router = router.merge(assessment);
        }
        None => warn!("Dispatcher settings incomplete, /assessment disabled"),
    }

    match proxy {
        Some(state) => {
            let stream = Router::new()
                .route("/stream", any(gated_proxy).options(preflight))
                .with_state(state);
            router = router.merge(stream);
        }
        None => warn!("REST_API_URL not set, /stream disabled"),
    }

    with_cors(router).layer(TraceLayer::new_for_http())
}

/// Build the combined app from settings, skipping handlers that cannot be configured
pub async fn create_app_from_settings(settings: &Settings) -> Router {
    let dispatch = match dispatch_state(settings).await {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("Dispatcher unavailable: {}", e);
            None
        }
    };
    let proxy = match proxy_state(settings) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("Gated proxy unavailable: {}", e);
            None
        }
    };

    create_app(dispatch, proxy)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Run the router inside the Lambda runtime
#[cfg(feature = "lambda")]
pub async fn serve(app: Router, _port: u16) -> anyhow::Result<()> {
    info!("Starting Lambda runtime");
    lambda_http::run(app)
        .await
        .map_err(|e| anyhow::anyhow!("Lambda runtime error: {}", e))
}

/// Run the router as a plain HTTP server until Ctrl-C
#[cfg(not(feature = "lambda"))]
pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
        info!("Shutting down gracefully...");
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
