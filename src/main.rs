//! HTML Card Server binary
//!
//! Loads configuration from the environment and serves the upload API and
//! the frontend until shut down.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    server::init_tracing(&config.log_level);

    server::start_server(config).await?;

    Ok(())
}
