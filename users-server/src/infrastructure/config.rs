use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;

use crate::infrastructure::database::RetryPolicy;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: DatabaseConfig,
    pub retry_policy: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            host: var("DB_HOST", "mysql"),
            port: parse(&lookup, "DB_PORT", 3306)?,
            user: var("DB_USER", "root"),
            password: var("DB_PASSWORD", "rootpassword"),
            name: var("DB_NAME", "mi_app_db"),
        };

        let retry_delay = parse(&lookup, "DB_RETRY_DELAY_SECS", 5u64)?;
        let max_attempts = match lookup("DB_MAX_ATTEMPTS") {
            Some(raw) if !raw.trim().is_empty() => {
                let max = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| anyhow::anyhow!("invalid DB_MAX_ATTEMPTS: {}", e))?;
                if max == 0 {
                    anyhow::bail!("invalid DB_MAX_ATTEMPTS: must be at least 1");
                }
                Some(max)
            }
            _ => None,
        };

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 3000)?,
            environment: var("APP_ENV", "development"),
            database,
            retry_policy: RetryPolicy {
                delay: Duration::from_secs(retry_delay),
                max_attempts,
            },
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.environment, "development");
        assert_eq!(config.database.host, "mysql");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.name, "mi_app_db");
        assert_eq!(config.retry_policy, RetryPolicy::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("PORT", "8081"),
            ("DB_HOST", "db.internal"),
            ("DB_NAME", "registry"),
            ("DB_RETRY_DELAY_SECS", "2"),
            ("DB_MAX_ATTEMPTS", "4"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.name, "registry");
        assert_eq!(config.retry_policy.delay, Duration::from_secs(2));
        assert_eq!(config.retry_policy.max_attempts, Some(4));
    }

    #[test]
    fn zero_max_attempts_is_an_error() {
        let err = config(&[("DB_MAX_ATTEMPTS", "0")]).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_ATTEMPTS"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = config(&[("DB_PASSWORD", "hunter2")]).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
