use anyhow::Context;
use tracing_subscriber::EnvFilter;

use wicket::{Config, Server, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading config from {}", path.to_string_lossy()))?,
        None => Config::default(),
    };

    tracing::info!(
        static_root = %config.static_root.display(),
        guard_echo = config.guard_echo,
        "starting"
    );

    Server::from_config(&config)
        .serve(app::router(&config))
        .await
        .context("server error")
}
