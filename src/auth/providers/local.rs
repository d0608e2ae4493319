use async_trait::async_trait;
use chrono::Utc;

use crate::{
    auth::{
        ADMIN_ROLE, Claims, TokenBundle,
        jwt::{JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::{dao::RefreshTokenDao, entities::user},
    error::AppError,
    services::user_service::UserService,
};

use super::{AuthProvider, AuthProviderId};

const REFRESH_TTL_DAYS: i64 = 30;

#[derive(Clone)]
pub struct LocalAuthProvider {
    user_service: UserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
}

impl LocalAuthProvider {
    pub fn new(
        user_service: UserService,
        refresh_token_dao: RefreshTokenDao,
        jwt: JwtKeys,
        access_ttl_secs: usize,
    ) -> Self {
        Self {
            user_service,
            refresh_token_dao,
            jwt,
            access_ttl_secs,
        }
    }

    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, AppError> {
        let roles = self.user_service.role_names(&user.id).await?;
        let claims = make_access_claims(&user.id, roles, self.access_ttl_secs);
        let access_token = encode_token(&self.jwt, &claims)?;

        let refresh = self
            .refresh_token_dao
            .create_refresh_token(&user.id, Some(REFRESH_TTL_DAYS))
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.access_ttl_secs,
        })
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn register(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::bad_request("Email required"));
        }

        if self.user_service.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .user_service
            .create_user(email, email, &password_hash)
            .await?;
        tracing::info!(user_id = %user.id, "registered user");

        self.issue_tokens(&user).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let user = self
            .user_service
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "login rejected");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let now = Utc::now().fixed_offset();
        self.user_service.set_last_login(&user.id, &now).await?;

        self.issue_tokens(&user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        let token = self
            .refresh_token_dao
            .find_active_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if token.revoked || token.expires_at < Utc::now().fixed_offset() {
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = self
            .user_service
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        self.refresh_token_dao.revoke_token(refresh_token).await?;

        self.issue_tokens(&user).await
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        decode_token(&self.jwt, access_token)
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        let role = match self.user_service.find_role(ADMIN_ROLE).await? {
            Some(role) => role,
            None => {
                let role = self.user_service.create_role(ADMIN_ROLE).await?;
                tracing::info!(role = %role.name, "seeded role");
                role
            }
        };

        let user = match self.user_service.find_by_email(&cfg.admin_email).await? {
            Some(existing) => existing,
            None => {
                let hash = hash_password(&cfg.admin_password)?;
                let user = self
                    .user_service
                    .create_user(&cfg.admin_email, &cfg.admin_email, &hash)
                    .await?;
                tracing::info!(user_id = %user.id, "seeded admin user");
                user
            }
        };

        if !self.user_service.has_role(&user.id, &role.id).await? {
            self.user_service.add_to_role(&user.id, &role.id).await?;
            tracing::info!(user_id = %user.id, role = %role.name, "granted admin role");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use sea_orm::{DatabaseBackend, IntoMockRow, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{AuthProviderId, LocalAuthProvider};
    use crate::{
        auth::{
            jwt::{JwtKeys, decode_token},
            password::hash_password,
            providers::AuthProvider,
        },
        config::AuthConfig,
        db::entities::{refresh_token, role, user, user_role},
        error::AppError,
        services::ServiceContext,
    };

    const SECRET: &[u8] = b"local-provider-secret";

    struct ProviderFixtureBuilder {
        mock: MockDatabase,
    }

    impl ProviderFixtureBuilder {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_rows<T, I>(mut self, rows: I) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
        {
            self.mock = self.mock.append_query_results([rows]);
            self
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> LocalAuthProvider {
            let db = self.mock.into_connection();
            let services = ServiceContext::new(&db);
            LocalAuthProvider::new(
                services.user(),
                services.refresh_token_dao(),
                JwtKeys::from_secret(SECRET),
                1800,
            )
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str, password_hash: &str) -> user::Model {
        user::Model {
            id,
            email: email.to_string(),
            user_name: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: ts(),
            last_login_at: None,
        }
    }

    fn refresh_model(token: &str, user_id: Uuid, expires_in_days: i64) -> refresh_token::Model {
        let now = Utc::now().fixed_offset();
        refresh_token::Model {
            id: Uuid::new_v4(),
            token: token.to_string(),
            user_id,
            expires_at: now + Duration::days(expires_in_days),
            created_at: now,
            revoked: false,
        }
    }

    #[tokio::test]
    async fn register_rejects_blank_email() {
        let provider = ProviderFixtureBuilder::new().build();

        let err = provider
            .register("   ", "password")
            .await
            .expect_err("register should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "Email required");
    }

    #[tokio::test]
    async fn register_conflicts_on_existing_email() {
        let provider = ProviderFixtureBuilder::new()
            .with_rows([user_model(Uuid::new_v4(), "alice@example.com", "hash")])
            .build();

        let err = provider
            .register("alice@example.com", "password")
            .await
            .expect_err("register should fail");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let provider = ProviderFixtureBuilder::new()
            .with_rows(Vec::<user::Model>::new())
            .build();

        let err = provider
            .register("alice@example.com", "abc")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Password too short");
    }

    #[tokio::test]
    async fn register_issues_tokens_carrying_roles() {
        let user_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let provider = ProviderFixtureBuilder::new()
            .with_rows(Vec::<user::Model>::new())
            .with_rows([user_model(user_id, "alice@example.com", "hash")])
            .with_rows([user_role::Model { user_id, role_id }])
            .with_rows([role::Model {
                id: role_id,
                name: "reviewer".to_string(),
            }])
            .with_rows([refresh_model("refresh-1", user_id, 30)])
            .build();

        let bundle = provider
            .register("alice@example.com", "password")
            .await
            .expect("register should succeed");

        assert_eq!(bundle.token_type, "Bearer");
        assert_eq!(bundle.expires_in, 1800);
        assert_eq!(bundle.refresh_token, "refresh-1");
        let claims = decode_token(&JwtKeys::from_secret(SECRET), &bundle.access_token)
            .expect("access token should decode");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.roles, vec!["reviewer".to_string()]);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let hash = hash_password("correct").expect("hash should succeed");
        let provider = ProviderFixtureBuilder::new()
            .with_rows([user_model(Uuid::new_v4(), "alice@example.com", &hash)])
            .build();

        let err = provider
            .login("alice@example.com", "incorrect")
            .await
            .expect_err("login should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_records_last_login_and_issues_tokens() {
        let user_id = Uuid::new_v4();
        let hash = hash_password("correct").expect("hash should succeed");
        let provider = ProviderFixtureBuilder::new()
            .with_rows([user_model(user_id, "alice@example.com", &hash)])
            .with_exec_result(1)
            .with_rows(Vec::<user_role::Model>::new())
            .with_rows([refresh_model("refresh-login", user_id, 30)])
            .build();

        let bundle = provider
            .login("alice@example.com", "correct")
            .await
            .expect("login should succeed");
        assert_eq!(bundle.refresh_token, "refresh-login");
    }

    #[tokio::test]
    async fn refresh_rejects_expired_token() {
        let provider = ProviderFixtureBuilder::new()
            .with_rows([refresh_model("stale", Uuid::new_v4(), -1)])
            .build();

        let err = provider
            .refresh("stale")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Refresh token expired");
    }

    #[tokio::test]
    async fn refresh_rejects_unknown_token() {
        let provider = ProviderFixtureBuilder::new()
            .with_rows(Vec::<refresh_token::Model>::new())
            .build();

        let err = provider
            .refresh("missing")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let provider = ProviderFixtureBuilder::new().build();
        assert_eq!(provider.id(), AuthProviderId::Local);

        let err = provider
            .verify("not-a-jwt")
            .await
            .expect_err("verify should fail");
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[tokio::test]
    async fn seed_admin_is_a_no_op_when_everything_exists() {
        let user_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let provider = ProviderFixtureBuilder::new()
            .with_rows([role::Model {
                id: role_id,
                name: "admin".to_string(),
            }])
            .with_rows([user_model(user_id, "admin@example.com", "hash")])
            .with_rows([user_role::Model { user_id, role_id }])
            .build();

        provider
            .seed_admin(&AuthConfig {
                provider: AuthProviderId::Local,
                jwt_secret: "secret".to_string(),
                admin_email: "admin@example.com".to_string(),
                admin_password: "adminpass".to_string(),
                access_ttl_secs: 1800,
            })
            .await
            .expect("seed should succeed");
    }
}
