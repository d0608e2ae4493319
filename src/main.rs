use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use todo_api::{
    auth::bootstrap::init_provider,
    config::AppConfig,
    db::connection,
    identity::IdentityStore,
    logging::init_tracing,
    mail::{Mailer, SmtpMailer, UnconfiguredMailer},
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::ServiceContext,
    state::AppState,
    storage::LocalFileStore,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .clone()
        .context("database config is required (APP_DATABASE__URL)")?;
    let auth_cfg = cfg
        .auth
        .clone()
        .context("auth config is required (APP_AUTH__JWT_SECRET, APP_AUTH__ADMIN_EMAIL, APP_AUTH__ADMIN_PASSWORD)")?;

    let db = connection::connect(&db_cfg).await?;
    let services = ServiceContext::new(&db);
    let auth_provider = init_provider(&auth_cfg, &services).await?;

    let mailer: Arc<dyn Mailer> = match cfg.smtp.as_ref() {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp).context("invalid smtp settings")?),
        None => {
            tracing::warn!("smtp is not configured; exports will fail");
            Arc::new(UnconfiguredMailer)
        }
    };
    let identity: Arc<dyn IdentityStore> = Arc::new(services.identity());
    let files = Arc::new(LocalFileStore::new(&cfg.storage.upload_dir));

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid general.host/general.port")?;

    let state = AppState::new(cfg, db, auth_provider, identity, mailer, files);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
