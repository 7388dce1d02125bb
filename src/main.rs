use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use mealplan_api::config::Config;
use mealplan_api::db::{self, PgRecipeStore};
use mealplan_api::routes::{create_router, AppState};
use mealplan_api::services::{Explainer, Recommender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let store = Arc::new(PgRecipeStore::new(pool));

    let recommender = Arc::new(Recommender::new(
        config.plan_cache_capacity,
        Duration::from_secs(config.plan_cache_ttl_secs),
    ));
    let explainer = Arc::new(Explainer::new(&config));

    let state = Arc::new(AppState {
        store,
        recommender,
        explainer,
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
