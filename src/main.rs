use dotenvy::dotenv;
use qrbrand::config::Settings;
use qrbrand::server::build_router;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    std::fs::create_dir_all(&settings.upload_dir)?;

    let address = format!("{}:{}", settings.host, settings.port);
    let app = build_router(settings);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {address}: {e}"))?;

    info!("qrbrand listening on {address}");
    axum::serve(listener, app).await?;

    Ok(())
}
