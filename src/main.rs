use std::sync::Arc;

use agenda_api::config::ApiConfig;
use agenda_core::booking::BookingCoordinator;
use agenda_db::{create_pool, schema::initialize_database, PgStore};
use agenda_notify::{build_notifier, config::NotifyConfig};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    let notify_config = NotifyConfig::from_env();

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    let coordinator = BookingCoordinator::new(
        Arc::new(PgStore::new(db_pool).with_lock_timeout(config.reserve_timeout)),
        build_notifier(&notify_config),
        config.timezone,
    )
    .with_reserve_timeout(config.reserve_timeout);

    agenda_api::start_server(config, Arc::new(coordinator)).await?;

    Ok(())
}
