//! Fixtures shared by router tests: an in-memory SQLite app with a recording mailer.

use std::{
    io,
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::{
    auth::{
        bootstrap::init_provider,
        jwt::{JwtKeys, encode_token, make_access_claims},
        password::hash_password,
        providers::AuthProviderId,
    },
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::{connection, entities::user},
    error::AppError,
    identity::IdentityStore,
    mail::{MailError, Mailer, OutgoingMail},
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::ServiceContext,
    state::AppState,
    storage::LocalFileStore,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "adminpass";
pub const TEST_PASSWORD: &str = "password";

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nothing and fails every send like a broken relay.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Rejected("554".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}

/// Formatted log lines written while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.0.lock() {
            buf.extend_from_slice(bytes);
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes events on the current thread into a buffer until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = Some(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    });
    cfg.auth = Some(AuthConfig {
        provider: AuthProviderId::Local,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_email: TEST_ADMIN_EMAIL.to_string(),
        admin_password: TEST_ADMIN_PASSWORD.to_string(),
        access_ttl_secs: 600,
    });
    cfg.storage.upload_dir = upload_dir.display().to_string();
    cfg
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
}

/// Connects a single-connection in-memory SQLite pool, syncs the schema and
/// seeds the admin account.
pub async fn spawn_test_app(upload_dir: &Path, mailer: RecordingMailer) -> anyhow::Result<TestApp> {
    let cfg = test_config(upload_dir);
    let db_cfg = cfg
        .database
        .clone()
        .ok_or_else(|| anyhow::anyhow!("test config has no database"))?;
    let auth_cfg = cfg
        .auth
        .clone()
        .ok_or_else(|| anyhow::anyhow!("test config has no auth"))?;

    let db = connection::connect(&db_cfg).await?;
    let services = ServiceContext::new(&db);
    let auth_provider = init_provider(&auth_cfg, &services).await?;

    let mailer = Arc::new(mailer);
    let identity: Arc<dyn IdentityStore> = Arc::new(services.identity());
    let files = Arc::new(LocalFileStore::new(upload_dir));
    let state = AppState::new(cfg, db, auth_provider, identity, mailer.clone(), files);

    let router = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer());

    Ok(TestApp {
        router,
        state,
        mailer,
    })
}

impl TestApp {
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub async fn create_user(&self, email: &str) -> Result<user::Model, AppError> {
        let hash = hash_password(TEST_PASSWORD)?;
        ServiceContext::new(self.db())
            .user()
            .create_user(email, email, &hash)
            .await
    }

    pub async fn admin_user(&self) -> Result<user::Model, AppError> {
        ServiceContext::new(self.db())
            .user()
            .find_by_email(TEST_ADMIN_EMAIL)
            .await?
            .ok_or_else(|| AppError::not_found("seeded admin missing"))
    }

    /// Signs an access token carrying the user's current roles.
    pub async fn bearer_for(&self, user_id: &uuid::Uuid) -> Result<String, AppError> {
        let roles = ServiceContext::new(self.db())
            .user()
            .role_names(user_id)
            .await?;
        let claims = make_access_claims(user_id, roles, 600);
        let token = encode_token(&JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes()), &claims)?;
        Ok(format!("Bearer {token}"))
    }
}
