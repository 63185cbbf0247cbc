use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use petclinic_customers::config::ServiceConfig;
use petclinic_customers::core::service::OwnerService;
use petclinic_customers::seed::seed_sample_data;
use petclinic_customers::server::{AppState, build_router, serve};
use petclinic_customers::storage::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::load()?;
    tracing::info!("starting petclinic-customers on {}", config.bind_addr());

    let store = Arc::new(InMemoryStore::new());
    if config.seed_sample_data {
        seed_sample_data(store.as_ref(), store.as_ref()).await?;
    }

    let owners = Arc::new(OwnerService::new(store.clone(), store.clone()));
    let app = build_router(AppState {
        owners,
        pet_types: store,
    });

    serve(app, &config.bind_addr()).await
}
