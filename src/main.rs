use record_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    record_server::init_tracing();

    let config = ServerConfig::from_env()?;
    record_server::run(config).await?;

    Ok(())
}
