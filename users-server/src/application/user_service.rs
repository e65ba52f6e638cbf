use std::sync::Arc;

use chrono::Duration;
use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{DeletedUser, NewUser, User, UserStats};
use crate::presentation::dto::CreateUserRequest;

/// Trailing window used for the "recent users" count.
pub const RECENT_WINDOW_DAYS: i64 = 7;

pub struct UserService<R: UserRepository + 'static> {
    repo: Arc<R>,
}

impl<R: UserRepository + 'static> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Gate for every route that needs the database.
    pub fn ensure_ready(&self) -> Result<(), DomainError> {
        if self.repo.is_ready() {
            Ok(())
        } else {
            Err(DomainError::NotReady)
        }
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.ensure_ready()?;
        self.repo.ping().await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list().await
    }

    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    #[instrument(skip(self, request))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, DomainError> {
        let new_user = NewUser::parse(
            request.nombre.as_deref(),
            request.email.as_deref(),
            request.telefono.as_deref(),
        )?;
        self.repo.create(new_user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i32) -> Result<DeletedUser, DomainError> {
        self.repo
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    pub async fn stats(&self) -> Result<UserStats, DomainError> {
        let total = self.repo.count().await?;
        let recent = self
            .repo
            .count_recent(Duration::days(RECENT_WINDOW_DAYS))
            .await?;
        Ok(UserStats { total, recent })
    }

    pub async fn close(&self) {
        self.repo.close().await;
    }
}
