use agents_gateway::api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = server::bootstrap().await?;

    // Fail the cold start rather than every request when settings are missing
    let state = server::dispatch_state(&settings).await?;

    server::serve(server::dispatch_app(state), settings.port).await
}
