use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Who may answer a question reached directly by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerPolicy {
    /// Only the expert the question is addressed to.
    #[default]
    AssignedExpert,
    /// Any user flagged as expert.
    AnyExpert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Base64 of at least 64 bytes; used to encrypt and sign the session cookie.
    pub secret_key: Option<String>,
    pub insecure_cookie: bool,
    pub session_max_age_days: Option<u32>,
    pub answer_policy: AnswerPolicy,
    pub max_connections: u32,
    pub admin_name: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url().to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            secret_key: None,
            insecure_cookie: false,
            session_max_age_days: None,
            answer_policy: AnswerPolicy::default(),
            max_connections: 5,
            admin_name: None,
            admin_password: None,
        }
    }
}

#[cfg(feature = "sqlite")]
fn default_database_url() -> &'static str {
    "sqlite:ask_expert.db"
}

#[cfg(feature = "postgres")]
fn default_database_url() -> &'static str {
    "postgres://localhost/ask_expert"
}

impl Config {
    /// Defaults, then the bare `DATABASE_URL` / `SECRET_KEY` variables, then `QA_*`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["database_url", "secret_key"]))
            .merge(Env::prefixed("QA_"))
    }

    pub fn from_env() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_close_the_answer_gap() {
        Jail::expect_with(|_jail| {
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.answer_policy, AnswerPolicy::AssignedExpert);
            assert_eq!(cfg.listen_addr, "0.0.0.0:8000");
            assert_eq!(cfg.max_connections, 5);
            assert!(!cfg.insecure_cookie);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_bare_env() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite:bare.db");
            jail.set_env("SECRET_KEY", "c2VjcmV0");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.database_url, "sqlite:bare.db");
            assert_eq!(cfg.secret_key.as_deref(), Some("c2VjcmV0"));

            jail.set_env("QA_DATABASE_URL", "sqlite:prefixed.db");
            jail.set_env("QA_ANSWER_POLICY", "any_expert");
            jail.set_env("QA_INSECURE_COOKIE", "true");
            jail.set_env("QA_MAX_CONNECTIONS", "2");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.database_url, "sqlite:prefixed.db");
            assert_eq!(cfg.answer_policy, AnswerPolicy::AnyExpert);
            assert!(cfg.insecure_cookie);
            assert_eq!(cfg.max_connections, 2);
            Ok(())
        });
    }

    #[test]
    fn negative_session_age_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("QA_SESSION_MAX_AGE_DAYS", "-1");
            assert!(Config::figment().extract::<Config>().is_err());

            jail.set_env("QA_SESSION_MAX_AGE_DAYS", "30");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.session_max_age_days, Some(30));
            Ok(())
        });
    }

    #[test]
    fn unknown_answer_policy_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("QA_ANSWER_POLICY", "whoever");
            assert!(Config::figment().extract::<Config>().is_err());
            Ok(())
        });
    }
}
