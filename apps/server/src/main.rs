use anyhow::Context;
use dormant_domain::config::{ApiConfig, LoggingConfig};
use dormant_kernel::config::load_config;
use dormant_logger::{LevelFilter, LogFormat, Logger};
use dormant_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "server".to_owned());
    let cfg: ApiConfig =
        load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;
    tracing::info!(config = %path, "Configuration loaded");

    Server::builder().config(cfg).build()?.run().await
}

fn init_logger(cfg: &LoggingConfig) -> anyhow::Result<Logger> {
    let level: LevelFilter =
        cfg.level.parse().with_context(|| format!("Invalid log level `{}`", cfg.level))?;
    let format: LogFormat = cfg.format.parse()?;

    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).format(format);
    if let Some(filter) = &cfg.env_filter {
        builder = builder.env_filter(filter.as_str());
    }

    let logger = match &cfg.directory {
        Some(directory) => builder.directory(directory).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
