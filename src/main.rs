use anyhow::Context;
use six_cities::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env().context("Failed to load configuration")?;
    init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}

fn init_tracing(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).context("Invalid RUST_LOG filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
