use anyhow::Result;
use nscdn_axum::{GatewayApp, GatewayState};
use nscdn_core::{CdnConfig, CdnSettings};

/// Environment prefix for configuration, e.g. `NSCDN__HTTP__PORT`
pub const ENV_PREFIX: &str = "NSCDN__";

/// Configuration from the environment, with an optional port override
/// (the first command line argument).
pub fn load_config<I>(args: I) -> CdnConfig
where
    I: IntoIterator<Item = String>,
{
    let mut config = CdnConfig::new();
    config.load_env(ENV_PREFIX);
    if let Some(port) = args.into_iter().next() {
        config.set("http.port", port);
    }
    config
}

pub async fn build(config: &CdnConfig) -> Result<(CdnSettings, GatewayApp)> {
    let settings = CdnSettings::from_config(&config.snapshot())?;
    let state = GatewayState::open(&settings).await?;
    Ok((settings, GatewayApp::new(state)))
}
