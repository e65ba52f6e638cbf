use crate::domain::error::DomainError;
use crate::domain::user::{DeletedUser, NewUser, User};
use crate::infrastructure::database::PoolSlot;
use async_trait::async_trait;
use chrono::Duration;
use sqlx::MySqlPool;
use tracing::{error, info};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    fn is_ready(&self) -> bool;
    async fn ping(&self) -> Result<(), DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;
    /// Removes the record and returns what it was, or `None` if nothing matched.
    async fn delete(&self, id: i32) -> Result<Option<DeletedUser>, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
    async fn count_recent(&self, window: Duration) -> Result<i64, DomainError>;
    async fn close(&self);
}

#[derive(Clone)]
pub struct MySqlUserRepository {
    slot: PoolSlot,
}

impl MySqlUserRepository {
    pub fn new(slot: PoolSlot) -> Self {
        Self { slot }
    }

    fn pool(&self) -> Result<&MySqlPool, DomainError> {
        self.slot.get().ok_or(DomainError::NotReady)
    }
}

fn map_db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DomainError::NotReady,
        other => DomainError::Internal(format!("database error: {}", other)),
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(self.pool()?)
            .await
            .map_err(|e| map_db_error("database ping failed", e))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nombre, email, telefono, fecha_creacion
            FROM usuarios
            ORDER BY fecha_creacion DESC, id DESC
            "#,
        )
        .fetch_all(self.pool()?)
        .await
        .map_err(|e| map_db_error("db error while listing users", e))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nombre, email, telefono, fecha_creacion
            FROM usuarios WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool()?)
        .await
        .map_err(|e| map_db_error(&format!("db error find_by_id {}", id), e))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let pool = self.pool()?;
        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (nombre, email, telefono)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .execute(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                info!(email = %user.email, "rejected duplicate email");
                DomainError::DuplicateEmail
            } else {
                map_db_error("failed to create user", e)
            }
        })?;

        let id = i32::try_from(result.last_insert_id())
            .map_err(|_| DomainError::Internal("insert id out of range".to_string()))?;

        let created = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("user {} vanished after insert", id)))?;

        info!(user_id = created.id, email = %created.email, "user created");
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<Option<DeletedUser>, DomainError> {
        let pool = self.pool()?;
        let existing = sqlx::query_as::<_, DeletedUser>(
            "SELECT id, nombre FROM usuarios WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_db_error(&format!("db error looking up user {}", id), e))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM usuarios WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| map_db_error(&format!("failed to delete user {}", id), e))?;

        info!(user_id = id, "user deleted");
        Ok(Some(existing))
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
            .fetch_one(self.pool()?)
            .await
            .map_err(|e| map_db_error("db error counting users", e))
    }

    async fn count_recent(&self, window: Duration) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM usuarios WHERE fecha_creacion >= DATE_SUB(NOW(), INTERVAL ? SECOND)",
        )
        .bind(window.num_seconds())
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| map_db_error("db error counting recent users", e))
    }

    async fn close(&self) {
        if let Some(pool) = self.slot.get() {
            info!("closing MySQL pool");
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MySqlUserRepository {
        MySqlUserRepository::new(PoolSlot::new())
    }

    #[tokio::test]
    async fn every_operation_reports_not_ready_without_a_pool() {
        let repo = repo();
        assert!(!repo.is_ready());

        assert!(matches!(repo.ping().await, Err(DomainError::NotReady)));
        assert!(matches!(repo.list().await, Err(DomainError::NotReady)));
        assert!(matches!(repo.find_by_id(1).await, Err(DomainError::NotReady)));
        assert!(matches!(repo.delete(1).await, Err(DomainError::NotReady)));
        assert!(matches!(repo.count().await, Err(DomainError::NotReady)));
        assert!(matches!(
            repo.count_recent(Duration::days(7)).await,
            Err(DomainError::NotReady)
        ));

        let new_user = NewUser::parse(Some("Ana"), Some("ana@test.com"), Some("555-1")).unwrap();
        assert!(matches!(repo.create(new_user).await, Err(DomainError::NotReady)));
    }

    #[tokio::test]
    async fn close_without_pool_is_a_no_op() {
        repo().close().await;
    }

    #[test]
    fn pool_exhaustion_maps_to_not_ready() {
        assert!(matches!(
            map_db_error("test", sqlx::Error::PoolTimedOut),
            DomainError::NotReady
        ));
        assert!(matches!(
            map_db_error("test", sqlx::Error::RowNotFound),
            DomainError::Internal(_)
        ));
    }
}
