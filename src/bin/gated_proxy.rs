use agents_gateway::api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = server::bootstrap().await?;
    let state = server::proxy_state(&settings)?;

    server::serve(server::gated_proxy_app(state), settings.port).await
}
