use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        name = %config.app.name,
        version = %config.app.version,
        "Starting ticket API"
    );

    // Connect to PostgreSQL with retry and bring the schema up to date
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    // Select the email transport once; issuance still works without one
    // (emails are then reported as failed in each outcome)
    let mailer = domain_notifications::Mailer::from_settings(&config.email)
        .map_err(|e| eyre::eyre!("Failed to initialize mailer: {}", e))?;

    let jwt_auth = axum_helpers::JwtAuth::new(&config.jwt);

    let state = AppState {
        config: config.clone(),
        db,
        jwt_auth,
    };

    let api_routes = api::routes(&state, mailer);
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    create_app(app, &config.server).await?;

    info!("Ticket API stopped");
    Ok(())
}
