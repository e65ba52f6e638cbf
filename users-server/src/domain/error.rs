use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("database unavailable")]
    NotReady,
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("duplicate email")]
    DuplicateEmail,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("route not found: {0}")]
    RouteNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("incomplete data")]
    MissingFields,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid request body")]
    MalformedBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: String,
}

impl DomainError {
    /// Short, client-facing label for the `error` field.
    pub fn label(&self) -> &'static str {
        match self {
            DomainError::NotReady => "database unavailable",
            DomainError::UserNotFound(_) => "user not found",
            DomainError::Validation(ValidationError::MissingFields) => "incomplete data",
            DomainError::Validation(ValidationError::InvalidEmail) => "invalid email",
            DomainError::Validation(ValidationError::MalformedBody) => "invalid request body",
            DomainError::DuplicateEmail => "duplicate email",
            DomainError::Internal(_) => "internal server error",
            DomainError::RouteNotFound(_) => "route not found",
        }
    }

    fn message(&self) -> String {
        match self {
            DomainError::NotReady => {
                "the server is starting up, please try again shortly".to_string()
            }
            DomainError::UserNotFound(id) => format!("no user found with id {id}"),
            DomainError::Validation(ValidationError::MissingFields) => {
                "nombre, email and telefono are required".to_string()
            }
            DomainError::Validation(ValidationError::InvalidEmail) => {
                "please provide a valid email address".to_string()
            }
            DomainError::Validation(ValidationError::MalformedBody) => {
                "the request body must be a JSON object".to_string()
            }
            DomainError::DuplicateEmail => "a user with that email already exists".to_string(),
            // Details stay in the server log.
            DomainError::Internal(_) => "an unexpected error occurred".to_string(),
            DomainError::RouteNotFound(path) => format!("route {path} does not exist"),
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::UserNotFound(_) | DomainError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::DuplicateEmail => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::Internal(detail) = self {
            error!(detail = %detail, "request failed with internal error");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.label(),
            message: self.message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(DomainError::NotReady, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(DomainError::UserNotFound("7".into()), StatusCode::NOT_FOUND)]
    #[case(ValidationError::MissingFields.into(), StatusCode::BAD_REQUEST)]
    #[case(ValidationError::InvalidEmail.into(), StatusCode::BAD_REQUEST)]
    #[case(DomainError::DuplicateEmail, StatusCode::CONFLICT)]
    #[case(DomainError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(DomainError::RouteNotFound("/nope".into()), StatusCode::NOT_FOUND)]
    fn maps_to_status(#[case] err: DomainError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[actix_web::test]
    async fn internal_error_hides_detail() {
        let response = DomainError::Internal("connection refused at 10.0.0.3".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "internal server error");
        assert!(!value["message"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[actix_web::test]
    async fn not_found_names_the_id() {
        let response = DomainError::UserNotFound("42".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "user not found");
        assert_eq!(value["message"], "no user found with id 42");
    }
}
