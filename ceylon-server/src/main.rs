use ceylon_server::{Config, Server, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref());

    if config.is_development() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set, signing tokens with a development placeholder");
    }
    tracing::info!(
        "Starting ceylon-server (env: {}, db: {})",
        config.environment,
        config.database_url
    );

    Server::new(config).run().await?;
    Ok(())
}
