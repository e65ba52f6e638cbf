mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;


use std::sync::Arc;

use application::user_service::UserService;
use data::user_repository::MySqlUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{ConnectionSupervisor, PoolSlot};
use infrastructure::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    // Data routes answer 503 until the supervisor publishes the pool.
    let slot = PoolSlot::new();
    let supervisor = ConnectionSupervisor::spawn(
        config.database.connect_options(),
        slot.clone(),
        config.retry_policy,
    );

    let service = UserService::new(Arc::new(MySqlUserRepository::new(slot)));

    server::run(config, service, supervisor).await
}
