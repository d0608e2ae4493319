use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::{self, redact_url};
use crate::config::DatabaseConfig;

/// Connects through the provider matching `cfg.url` and brings the schema in
/// line with the registered entities.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let registry = providers::default_registry()?;
    let provider = registry.provider_for_url(&cfg.url)?;

    info!(
        provider = provider.id().as_str(),
        url = %redact_url(&cfg.url),
        "connecting to database"
    );
    let db = provider
        .connect(cfg)
        .await
        .with_context(|| format!("failed to connect to {}", redact_url(&cfg.url)))?;
    provider.post_connect(&db, cfg).await?;

    sync_schema(&db).await?;
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(db)
        .await?;
    Ok(())
}
