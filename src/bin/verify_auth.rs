use agents_gateway::api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = server::bootstrap().await?;
    server::serve(server::verify_app(), settings.port).await
}
