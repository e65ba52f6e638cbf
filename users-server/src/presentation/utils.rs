use std::time::Instant;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use tracing::warn;

use crate::domain::error::{DomainError, ValidationError};
use crate::presentation::middleware::RequestId;

/// Process-level facts reported by the health and stats routes.
#[derive(Debug, Clone)]
pub struct AppInfo {
    started_at: Instant,
    database: String,
}

impl AppInfo {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            database: database.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Ids that are not integers cannot match any row.
pub fn parse_user_id(raw: &str) -> Result<i32, DomainError> {
    raw.parse::<i32>()
        .map_err(|_| DomainError::UserNotFound(raw.to_owned()))
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(
            request_id = %request_id(req),
            error = %err,
            "rejected malformed JSON body"
        );
        DomainError::Validation(ValidationError::MalformedBody).into()
    })
}

pub async fn route_not_found(req: HttpRequest) -> Result<HttpResponse, DomainError> {
    Err(DomainError::RouteNotFound(req.path().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
    }

    #[test]
    fn garbage_ids_are_not_found() {
        match parse_user_id("abc") {
            Err(DomainError::UserNotFound(raw)) => assert_eq!(raw, "abc"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
