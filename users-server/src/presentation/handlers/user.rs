use crate::application::user_service::UserService;
use crate::data::user_repository::UserRepository;
use crate::domain::error::{DomainError, ValidationError};
use crate::presentation::dto::{CreateUserRequest, CreateUserResponse, DeleteUserResponse};
use crate::presentation::utils::{parse_user_id, request_id};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

pub async fn list_users<R: UserRepository + 'static>(
    req: HttpRequest,
    service: web::Data<UserService<R>>,
) -> Result<HttpResponse, DomainError> {
    service.ensure_ready()?;
    let users = service.list_users().await?;

    info!(
        request_id = %request_id(&req),
        count = users.len(),
        "users retrieved"
    );

    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user<R: UserRepository + 'static>(
    service: web::Data<UserService<R>>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    service.ensure_ready()?;
    let id = parse_user_id(&path)?;
    let user = service.get_user(id).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn create_user<R: UserRepository + 'static>(
    req: HttpRequest,
    service: web::Data<UserService<R>>,
    payload: Result<web::Json<CreateUserRequest>, actix_web::Error>,
) -> Result<HttpResponse, DomainError> {
    service.ensure_ready()?;
    let payload = payload.map_err(|_| ValidationError::MalformedBody)?;
    let user = service.create_user(&payload).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        "user registered"
    );

    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "user created successfully".to_string(),
        user,
    }))
}

pub async fn delete_user<R: UserRepository + 'static>(
    req: HttpRequest,
    service: web::Data<UserService<R>>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    service.ensure_ready()?;
    let id = parse_user_id(&path)?;
    let deleted_user = service.delete_user(id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = deleted_user.id,
        "user removed"
    );

    Ok(HttpResponse::Ok().json(DeleteUserResponse {
        message: "user deleted successfully".to_string(),
        deleted_user,
    }))
}
