//! UI state that does not touch the DOM: form checks, the two status
//! indicators and the single transient notice.

/// How often the user list is re-fetched.
pub const USERS_REFRESH_MS: u32 = 30_000;
/// How often backend and database reachability are re-checked.
pub const STATUS_REFRESH_MS: u32 = 60_000;
/// Lifetime of a transient notice.
pub const NOTICE_TTL_MS: u32 = 5_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
}

impl UserForm {
    /// Trimmed copy, or `None` if any field is blank.
    pub fn validated(&self) -> Option<UserForm> {
        let form = UserForm {
            nombre: self.nombre.trim().to_string(),
            email: self.email.trim().to_string(),
            telefono: self.telefono.trim().to_string(),
        };
        if form.nombre.is_empty() || form.email.is_empty() || form.telefono.is_empty() {
            None
        } else {
            Some(form)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reachability {
    #[default]
    Checking,
    Online,
    Offline,
    Error,
}

impl Reachability {
    pub fn css_class(self) -> &'static str {
        match self {
            Reachability::Checking => "status",
            Reachability::Online => "status online",
            Reachability::Offline | Reachability::Error => "status offline",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStatus {
    pub backend: Reachability,
    pub database: Reachability,
}

impl SystemStatus {
    /// Database is only meaningful when the backend answered; `None` means
    /// the backend was reachable but its health check failed.
    pub fn from_checks(backend: Result<bool, ()>, database: Option<bool>) -> Self {
        match (backend, database) {
            (Ok(true), Some(true)) => Self {
                backend: Reachability::Online,
                database: Reachability::Online,
            },
            (Ok(true), _) => Self {
                backend: Reachability::Online,
                database: Reachability::Error,
            },
            (Ok(false), _) => Self {
                backend: Reachability::Offline,
                database: Reachability::Offline,
            },
            (Err(()), _) => Self {
                backend: Reachability::Error,
                database: Reachability::Offline,
            },
        }
    }

    pub fn backend_label(&self) -> &'static str {
        match self.backend {
            Reachability::Checking => "checking...",
            Reachability::Online => "🟢 Online",
            Reachability::Offline => "🔴 Offline",
            Reachability::Error => "🔴 Error",
        }
    }

    pub fn database_label(&self) -> &'static str {
        match self.database {
            Reachability::Checking => "checking...",
            Reachability::Online => "🟢 Connected",
            Reachability::Offline => "🔴 No connection",
            Reachability::Error => "🔴 Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "message success",
            NoticeKind::Error => "message error",
        }
    }
}

/// Holds at most one notice. Each `show` replaces the previous one and
/// returns an id; `expire` only clears the notice it was issued for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeSlot {
    next_id: u64,
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.current = Some(Notice {
            id: self.next_id,
            kind,
            text: text.into(),
        });
        self.next_id
    }

    pub fn expire(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_local_validation() {
        let form = UserForm {
            nombre: "Ana".into(),
            email: "   ".into(),
            telefono: "555-1".into(),
        };
        assert_eq!(form.validated(), None);
    }

    #[test]
    fn validation_trims_fields() {
        let form = UserForm {
            nombre: " Ana ".into(),
            email: "ana@test.com ".into(),
            telefono: " 555-1".into(),
        };
        assert_eq!(
            form.validated(),
            Some(UserForm {
                nombre: "Ana".into(),
                email: "ana@test.com".into(),
                telefono: "555-1".into(),
            })
        );
    }

    #[test]
    fn status_transitions() {
        let up = SystemStatus::from_checks(Ok(true), Some(true));
        assert_eq!(up.backend, Reachability::Online);
        assert_eq!(up.database, Reachability::Online);

        let db_down = SystemStatus::from_checks(Ok(true), Some(false));
        assert_eq!(db_down.backend, Reachability::Online);
        assert_eq!(db_down.database, Reachability::Error);

        let unhealthy = SystemStatus::from_checks(Ok(false), None);
        assert_eq!(unhealthy.backend, Reachability::Offline);
        assert_eq!(unhealthy.database, Reachability::Offline);

        let unreachable = SystemStatus::from_checks(Err(()), None);
        assert_eq!(unreachable.backend, Reachability::Error);
        assert_eq!(unreachable.database_label(), "🔴 No connection");
    }

    #[test]
    fn newer_notice_replaces_older() {
        let mut slot = NoticeSlot::default();
        let first = slot.show(NoticeKind::Success, "user added");
        let second = slot.show(NoticeKind::Error, "duplicate email");

        assert_ne!(first, second);
        assert_eq!(slot.current().map(|n| n.text.as_str()), Some("duplicate email"));

        // The first notice's timer must not clear the second.
        slot.expire(first);
        assert!(slot.current().is_some());

        slot.expire(second);
        assert!(slot.current().is_none());
    }
}
