use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Fixed upper bound on concurrent database connections.
pub const POOL_SIZE: u32 = 10;

/// How long a request may wait in the acquire queue before giving up.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS usuarios (
        id INT AUTO_INCREMENT PRIMARY KEY,
        nombre VARCHAR(100) NOT NULL,
        email VARCHAR(150) UNIQUE NOT NULL,
        telefono VARCHAR(20) NOT NULL,
        fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        fecha_actualizacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

/// Write-once holder for the pool. Empty until the supervisor connects.
#[derive(Clone, Default)]
pub struct PoolSlot(Arc<OnceCell<MySqlPool>>);

impl PoolSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&MySqlPool> {
        self.0.get()
    }

    pub fn is_ready(&self) -> bool {
        self.0.get().is_some()
    }

    /// Returns `false` if a pool was already published.
    pub fn publish(&self, pool: MySqlPool) -> bool {
        self.0.set(pool).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// Total connection attempts, the first included. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_secs(5))
    }
}

/// Opens the pool, verifies one connection and makes sure the `usuarios`
/// table exists.
pub async fn create_pool(options: MySqlConnectOptions) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(POOL_SIZE)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;
    info!("connected to MySQL");

    if let Err(e) = ensure_schema(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    info!("table usuarios verified");
    Ok(())
}

/// Runs `connect` until it succeeds or the policy runs out of attempts.
pub async fn connect_with_retry<T, E, F, Fut>(policy: RetryPolicy, mut connect: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        info!(attempt, "connecting to MySQL");

        match connect().await {
            Ok(value) => return Some(value),
            Err(e) if policy.allows_retry_after(attempt) => {
                warn!(
                    attempt,
                    error = %e,
                    retry_in_ms = policy.delay.as_millis() as u64,
                    "failed to connect to MySQL, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                error!(attempt, error = %e, "failed to connect to MySQL, giving up");
                return None;
            }
        }
    }
}

/// Background task that brings the pool up and publishes it into a [`PoolSlot`].
pub struct ConnectionSupervisor {
    handle: JoinHandle<()>,
}

impl ConnectionSupervisor {
    pub fn spawn(options: MySqlConnectOptions, slot: PoolSlot, policy: RetryPolicy) -> Self {
        let handle = tokio::spawn(async move {
            let pool = connect_with_retry(policy, || create_pool(options.clone())).await;
            match pool {
                Some(pool) => {
                    if !slot.publish(pool) {
                        warn!("pool already initialized, discarding new pool");
                    }
                }
                None => error!("database stays unavailable, data routes will answer 503"),
            }
        });
        Self { handle }
    }

    /// Stops any pending retry.
    pub fn shutdown(self) {
        if !self.handle.is_finished() {
            info!("cancelling database connection retries");
        }
        self.handle.abort();
    }
}
