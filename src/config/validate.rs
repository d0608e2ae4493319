use anyhow::{Result, bail};

use super::AppConfig;
use crate::auth::password::MIN_PASSWORD_LEN;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "auth.admin_password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }

        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_secs == 0 {
            errors.push("auth.access_ttl_secs must be > 0".to_string());
        }
    }

    if let Some(smtp) = cfg.smtp.as_ref() {
        if smtp.server.trim().is_empty() {
            errors.push("smtp.server must not be empty".to_string());
        }

        if smtp.sender_email.trim().is_empty() {
            errors.push("smtp.sender_email must not be empty".to_string());
        }
    }

    if cfg.storage.upload_dir.trim().is_empty() {
        errors.push("storage.upload_dir must not be empty".to_string());
    }

    if cfg.storage.max_upload_bytes == 0 {
        errors.push("storage.max_upload_bytes must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::{
        auth::providers::AuthProviderId,
        config::{AppConfig, AuthConfig, DatabaseConfig, SmtpConfig},
    };

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_problem_into_one_error() {
        let mut cfg = AppConfig::default();
        cfg.database = Some(DatabaseConfig {
            url: " ".to_string(),
            max_connections: 1,
            min_idle: 5,
        });
        cfg.auth = Some(AuthConfig {
            provider: AuthProviderId::Local,
            jwt_secret: String::new(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "abc".to_string(),
            access_ttl_secs: 60,
        });

        let message = validate(&cfg).expect_err("config should fail").to_string();
        assert!(message.contains("database.url must not be empty"));
        assert!(message.contains("database.min_idle (5) must be <= database.max_connections (1)"));
        assert!(message.contains("auth.admin_password must be at least 4 characters"));
        assert!(message.contains("auth.jwt_secret must not be empty"));
    }

    #[test]
    fn smtp_requires_server_and_sender() {
        let mut cfg = AppConfig::default();
        cfg.smtp = Some(SmtpConfig {
            server: String::new(),
            port: 587,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            sender_name: "To-Do".to_string(),
            sender_email: String::new(),
        });

        let message = validate(&cfg).expect_err("config should fail").to_string();
        assert!(message.contains("smtp.server must not be empty"));
        assert!(message.contains("smtp.sender_email must not be empty"));
    }
}
