use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use sisu_price::app;
use sisu_price::config::{AppConfig, StoreKind};
use sisu_price::logging::{init_logging, LoggingConfig};
use sisu_price::services::price_query_service::PriceQueryService;
use sisu_price::state::AppState;
use sisu_price::store::{InMemoryPriceRepository, PgPriceRepository, PriceRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env()?;

    let repository: Arc<dyn PriceRepository> = match config.store {
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set when PRICE_STORE=postgres")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;

            let repository = PgPriceRepository::new(pool);
            repository.migrate().await?;
            tracing::info!("🗄️ Using price store: Postgres");
            Arc::new(repository)
        }
        StoreKind::Memory => {
            tracing::info!("🗄️ Using price store: in-memory reference data");
            Arc::new(InMemoryPriceRepository::with_reference_data())
        }
    };

    tracing::info!(
        "Price cache: capacity={} ttl={}s store_timeout={}ms",
        config.cache.max_capacity,
        config.cache.ttl.as_secs(),
        config.cache.store_timeout.as_millis()
    );
    let state = AppState::new(PriceQueryService::new(repository, config.cache.clone()));
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 sisu-price running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
