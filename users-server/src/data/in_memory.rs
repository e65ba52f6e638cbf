//! In-process [`UserRepository`] used by the handler and service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{DeletedUser, NewUser, User};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: Vec<User>,
}

pub struct InMemoryUserRepository {
    ready: AtomicBool,
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    pub fn ready() -> Self {
        Self {
            ready: AtomicBool::new(true),
            table: Mutex::new(Table::default()),
        }
    }

    pub fn not_ready() -> Self {
        let repo = Self::ready();
        repo.ready.store(false, Ordering::SeqCst);
        repo
    }

    /// Inserts a row with an explicit creation time.
    pub fn seed(&self, name: &str, email: &str, created_at: chrono::DateTime<Utc>) -> User {
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let user = User {
            id: table.next_id,
            name: name.to_owned(),
            email: email.to_owned(),
            phone: "000".to_owned(),
            created_at,
        };
        table.rows.push(user.clone());
        user
    }

    fn guard(&self) -> Result<(), DomainError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(DomainError::NotReady)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.guard()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.guard()?;
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        self.guard()?;
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        self.guard()?;
        let mut table = self.table.lock().unwrap();
        if table.rows.iter().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateEmail);
        }
        table.next_id += 1;
        let created = User {
            id: table.next_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: Utc::now(),
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<Option<DeletedUser>, DomainError> {
        self.guard()?;
        let mut table = self.table.lock().unwrap();
        let Some(pos) = table.rows.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let removed = table.rows.remove(pos);
        Ok(Some(DeletedUser::from(&removed)))
    }

    async fn count(&self) -> Result<i64, DomainError> {
        self.guard()?;
        Ok(self.table.lock().unwrap().rows.len() as i64)
    }

    async fn count_recent(&self, window: Duration) -> Result<i64, DomainError> {
        self.guard()?;
        let since = Utc::now() - window;
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().filter(|u| u.created_at >= since).count() as i64)
    }

    async fn close(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }
}
