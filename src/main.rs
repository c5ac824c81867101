use anyhow::Context;
use dotenvy::dotenv;

use jokka::config::Config;
use jokka::{build, telemetry, Backends};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;
    config.ensure_server_ready()?;
    let backends = Backends::from_config(&config)
        .await
        .context("failed to initialise backends")?;

    tracing::info!(
        store = ?config.store_backend,
        uploads = %config.upload_dir.display(),
        "starting jokka"
    );

    build(config, backends)
        .context("failed to prepare upload directory")?
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;
    Ok(())
}
