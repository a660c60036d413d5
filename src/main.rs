use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use healthqai::config::{ServerConfig, USAGE, has_flag};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let config = ServerConfig::from_env_and_args(&args);
    info!(
        target: "healthqai",
        "HealthQAI starting: RUST_LOG='{}', http_port={}, model='{}'",
        rust_log, config.http_port, config.model_path.display()
    );

    healthqai::server::run_with_config(config).await
}
