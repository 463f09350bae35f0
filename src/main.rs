use inkpost::api;
use inkpost::config::AppConfig;
use inkpost::errors::Result;
use inkpost::notifier;
use inkpost::observability;
use inkpost::storage;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_logging();

    let config = AppConfig::from_env()?;
    info!(
        address = %config.server.bind_address(),
        database = %config.database.url,
        smtp_configured = config.smtp.is_configured(),
        "Configuration loaded"
    );

    let pool = storage::create_pool(&config.database).await?;
    let notifier = notifier::notifier_from_config(&config.smtp)?;

    api::start_server(&config, pool, notifier).await
}
