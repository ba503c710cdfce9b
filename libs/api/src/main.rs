use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use api::{serve, Config};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = util::load_env()?;
    let config = Config::load("Config.toml")
        .context("failed to load Config.toml")?
        .with_overrides(&secrets);
    let port = config.server.port;

    let router = serve(config).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(&address).await?;
    info!(task = "listen", address = %address);

    Ok(axum::serve(listener, router).await?)
}
