use crate::client::{UsersClientHttp, UsersClientTrait};
use crate::error::UsersClientError;
use crate::state::{
    NoticeKind, NoticeSlot, SystemStatus, UserForm, NOTICE_TTL_MS, STATUS_REFRESH_MS,
    USERS_REFRESH_MS,
};
use chrono::{DateTime, Utc};
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};

mod client;
mod error;
mod state;

const BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub fecha_creacion: Option<DateTime<Utc>>,
}

type UsersResource = Resource<Result<Vec<User>, UsersClientError>>;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

/// Replaces whatever notice is showing and schedules its removal.
fn show_notice(mut notices: Signal<NoticeSlot>, kind: NoticeKind, text: String) {
    let id = notices.write().show(kind, text);
    spawn(async move {
        TimeoutFuture::new(NOTICE_TTL_MS).await;
        notices.write().expire(id);
    });
}

async fn check_system(client: &impl UsersClientTrait) -> SystemStatus {
    let backend = match client.health().await {
        Ok(up) => up,
        Err(e) => {
            warn!("error checking system status: {e}");
            return SystemStatus::from_checks(Err(()), None);
        }
    };
    if !backend {
        return SystemStatus::from_checks(Ok(false), None);
    }

    match client.db_status().await {
        Ok(db) => SystemStatus::from_checks(Ok(true), Some(db)),
        Err(e) => {
            warn!("error checking database status: {e}");
            SystemStatus::from_checks(Err(()), None)
        }
    }
}

#[component]
fn App() -> Element {
    let notices = use_signal(NoticeSlot::default);
    let mut users: UsersResource =
        use_resource(|| async move { UsersClientHttp::new(BASE_URL).list_users().await });

    use_context_provider(|| notices);
    use_context_provider(|| users);

    use_future(move || async move {
        loop {
            TimeoutFuture::new(USERS_REFRESH_MS).await;
            users.restart();
        }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        div { class: "container",
            h1 { "User registry" }
            StatusBar {}
            div { class: "card",
                h2 { "Add user" }
                UserFormView {}
            }
            div { class: "card",
                h2 { "Users" }
                UserList {}
            }
        }
    }
}

#[component]
fn StatusBar() -> Element {
    let mut status = use_signal(SystemStatus::default);

    use_future(move || async move {
        let client = UsersClientHttp::new(BASE_URL);
        loop {
            let next = check_system(&client).await;
            status.set(next);
            TimeoutFuture::new(STATUS_REFRESH_MS).await;
        }
    });

    let current = *status.read();

    rsx! {
        div { class: "status-bar",
            div {
                "Backend: "
                span { id: "backendStatus", class: current.backend.css_class(), "{current.backend_label()}" }
            }
            div {
                "Database: "
                span { id: "dbStatus", class: current.database.css_class(), "{current.database_label()}" }
            }
        }
    }
}

#[component]
fn UserFormView() -> Element {
    let notices = use_context::<Signal<NoticeSlot>>();
    let mut users = use_context::<UsersResource>();
    let mut form = use_signal(UserForm::default);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();

        let Some(valid) = form.read().validated() else {
            show_notice(
                notices,
                NoticeKind::Error,
                "Please fill in every field".to_string(),
            );
            return;
        };

        spawn(async move {
            match UsersClientHttp::new(BASE_URL).create_user(&valid).await {
                Ok(_) => {
                    show_notice(
                        notices,
                        NoticeKind::Success,
                        "User added successfully".to_string(),
                    );
                    form.set(UserForm::default());
                    users.restart();
                }
                Err(e) => {
                    warn!("error adding user: {e}");
                    show_notice(notices, NoticeKind::Error, format!("Error adding user: {e}"));
                }
            }
        });
    };

    let notice = notices.read().current().cloned();

    rsx! {
        form { id: "userForm", onsubmit: on_submit,
            input {
                r#type: "text",
                placeholder: "Name",
                value: "{form.read().nombre}",
                oninput: move |evt| form.write().nombre = evt.value(),
            }
            input {
                r#type: "email",
                placeholder: "Email",
                value: "{form.read().email}",
                oninput: move |evt| form.write().email = evt.value(),
            }
            input {
                r#type: "tel",
                placeholder: "Phone",
                value: "{form.read().telefono}",
                oninput: move |evt| form.write().telefono = evt.value(),
            }
            button { r#type: "submit", "Add user" }
        }
        if let Some(notice) = notice {
            div { class: notice.css_class(), "{notice.text}" }
        }
    }
}

#[component]
fn UserList() -> Element {
    let users = use_context::<UsersResource>();

    rsx! {
        div { id: "usersList",
            match users.read().as_ref() {
                Some(Ok(list)) if !list.is_empty() => rsx! {
                    for user in list.iter() {
                        UserCard { key: "{user.id}", user: user.clone() }
                    }
                },
                Some(Ok(_)) => rsx! { p { class: "empty", "No users registered" } },
                Some(Err(e)) => rsx! { p { class: "load-error", "❌ Error loading users: {e}" } },
                None => rsx! { div { id: "loading", "Loading users..." } },
            }
        }
    }
}

#[component]
fn UserCard(user: User) -> Element {
    let notices = use_context::<Signal<NoticeSlot>>();
    let mut users = use_context::<UsersResource>();
    let id = user.id;

    let on_delete = move |_| {
        if !gloo_dialogs::confirm("Are you sure you want to delete this user?") {
            return;
        }

        spawn(async move {
            match UsersClientHttp::new(BASE_URL).delete_user(id).await {
                Ok(()) => {
                    show_notice(
                        notices,
                        NoticeKind::Success,
                        "User deleted successfully".to_string(),
                    );
                    users.restart();
                }
                Err(e) => {
                    warn!("error deleting user: {e}");
                    show_notice(notices, NoticeKind::Error, format!("Error deleting user: {e}"));
                }
            }
        });
    };

    rsx! {
        div { class: "user-card",
            div { class: "user-info",
                div { class: "user-detail",
                    span { class: "user-label", "Name" }
                    span { class: "user-value", "{user.nombre}" }
                }
                div { class: "user-detail",
                    span { class: "user-label", "Email" }
                    span { class: "user-value", "{user.email}" }
                }
                div { class: "user-detail",
                    span { class: "user-label", "Phone" }
                    span { class: "user-value", "{user.telefono}" }
                }
                button { class: "delete-btn", onclick: on_delete, "🗑️ Delete" }
            }
        }
    }
}
