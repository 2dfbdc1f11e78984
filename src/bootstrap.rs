//! Startup: pool, schema, admin seeding and cookie key.

use axum_extra::extract::cookie::Key;
use base64::Engine;
use time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, DbPool, NewUser, QaStorage};
use crate::error::QaError;
use crate::middleware::SessionSettings;
use crate::router::QaState;
use crate::service::password;

/// Build the shared application state from configuration.
pub async fn connect(cfg: &Config) -> Result<QaState, QaError> {
    let key = session_key(cfg.secret_key.as_deref())?;
    let pool = db::connect(&cfg.database_url, cfg.max_connections).await?;

    if let (Some(name), Some(pw)) = (cfg.admin_name.as_deref(), cfg.admin_password.as_deref()) {
        seed_admin(&pool, name, pw).await?;
    }

    Ok(QaState::new(pool, key, cfg.answer_policy, session_settings(cfg)))
}

/// Cookie attributes for new sessions.
pub fn session_settings(cfg: &Config) -> SessionSettings {
    SessionSettings {
        secure: !cfg.insecure_cookie,
        max_age: cfg
            .session_max_age_days
            .map(|days| Duration::days(i64::from(days))),
    }
}

/// Decode the configured cookie key, or generate a throwaway one.
pub fn session_key(secret: Option<&str>) -> Result<Key, QaError> {
    let Some(secret) = secret else {
        warn!("no secret_key configured; sessions will not survive a restart");
        return Ok(Key::generate());
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(secret.trim())
        .map_err(|e| QaError::Config(format!("secret_key is not valid base64: {e}")))?;
    Key::try_from(bytes.as_slice())
        .map_err(|_| QaError::Config("secret_key must decode to at least 64 bytes".to_string()))
}

/// Create the admin account, or grant admin to an existing user of that name.
/// An existing user's password is left untouched.
pub async fn seed_admin(pool: &DbPool, name: &str, password: &str) -> Result<i64, QaError> {
    let mut tx = db::begin_write(pool).await?;
    let mut store = QaStorage::new(&mut tx);

    let id = match store.user_by_name(name).await? {
        Some(user) => {
            if !user.admin {
                store.grant_admin(user.id).await?;
                info!(user_id = user.id, "granted admin to existing user");
            }
            user.id
        }
        None => {
            let password_hash = password::hash_password(password)?;
            let id = store
                .create_user(NewUser {
                    name,
                    password_hash: &password_hash,
                    expert: false,
                    admin: true,
                })
                .await?;
            info!(user_id = id, "created admin user");
            id
        }
    };

    tx.commit().await?;
    Ok(id)
}
