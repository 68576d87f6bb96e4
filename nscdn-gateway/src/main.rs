use anyhow::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = nscdn_gateway::load_config(std::env::args().skip(1));
    let (settings, app) = nscdn_gateway::build(&config).await?;

    info!(
        addr = %settings.addr(),
        data_dir = %settings.data_dir.display(),
        legacy = settings.legacy_origin.as_deref().unwrap_or("disabled"),
        "starting nscdn"
    );

    app.listen(settings.addr()).await?;

    Ok(())
}
