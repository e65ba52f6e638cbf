use crate::application::user_service::UserService;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{DbStatusResponse, HealthResponse, StatsResponse};
use crate::presentation::utils::AppInfo;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::error;

pub async fn health(info: web::Data<AppInfo>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        message: "server is running",
        timestamp: Utc::now(),
        uptime: info.uptime_secs(),
    })
}

/// Round-trips to the database. Answers 500, not 503, when the pool is
/// missing: this route reports connectivity rather than gating on it.
pub async fn db_status<R: UserRepository + 'static>(
    info: web::Data<AppInfo>,
    service: web::Data<UserService<R>>,
) -> HttpResponse {
    match service.ping().await {
        Ok(()) => HttpResponse::Ok().json(DbStatusResponse {
            status: "OK",
            message: "database connected",
            database: Some(info.database().to_owned()),
            error: None,
        }),
        Err(e) => {
            error!(error = %e, "database status check failed");
            HttpResponse::InternalServerError().json(DbStatusResponse {
                status: "ERROR",
                message: "database connection error",
                database: None,
                error: Some(e.label()),
            })
        }
    }
}

pub async fn stats<R: UserRepository + 'static>(
    info: web::Data<AppInfo>,
    service: web::Data<UserService<R>>,
) -> Result<HttpResponse, DomainError> {
    service.ensure_ready()?;
    let stats = service.stats().await?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_users: stats.total,
        recent_users: stats.recent,
        server_uptime: info.uptime_secs(),
        timestamp: Utc::now(),
    }))
}
