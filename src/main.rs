use agents_gateway::api::server;

// All three handlers behind one router: the local development server, or a
// single Lambda fronting every route when built with `--features lambda`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = server::bootstrap().await?;

    tracing::info!("Starting agents gateway");

    let app = server::create_app_from_settings(&settings).await;
    server::serve(app, settings.port).await
}
