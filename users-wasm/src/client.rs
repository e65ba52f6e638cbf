use crate::error::UsersClientError;
use crate::state::UserForm;
use crate::User;
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

#[async_trait(?Send)]
pub trait UsersClientTrait: 'static {
    async fn health(&self) -> Result<bool, UsersClientError>;
    async fn db_status(&self) -> Result<bool, UsersClientError>;
    async fn list_users(&self) -> Result<Vec<User>, UsersClientError>;
    async fn create_user(&self, form: &UserForm) -> Result<User, UsersClientError>;
    async fn delete_user(&self, id: i32) -> Result<(), UsersClientError>;
}

#[derive(Clone)]
pub struct UsersClientHttp {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    user: User,
}

impl UsersClientHttp {
    pub fn new(endpoint: &str) -> Self {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: Request) -> Result<T, UsersClientError> {
        let response = request.send().await?;

        if response.ok() {
            response.json().await.map_err(UsersClientError::from)
        } else {
            Err(Self::failure(response).await)
        }
    }

    async fn failure(response: Response) -> UsersClientError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => UsersClientError::Api {
                status,
                error: body.error,
            },
            Err(_) => UsersClientError::Http { status },
        }
    }
}

#[async_trait(?Send)]
impl UsersClientTrait for UsersClientHttp {
    async fn health(&self) -> Result<bool, UsersClientError> {
        let response = Request::get(&self.url("/health")).send().await?;
        Ok(response.ok())
    }

    async fn db_status(&self) -> Result<bool, UsersClientError> {
        let response = Request::get(&self.url("/db-status")).send().await?;
        Ok(response.ok())
    }

    async fn list_users(&self) -> Result<Vec<User>, UsersClientError> {
        let response = Request::get(&self.url("/users"))
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.ok() {
            response.json().await.map_err(UsersClientError::from)
        } else {
            Err(UsersClientError::Http {
                status: response.status(),
            })
        }
    }

    async fn create_user(&self, form: &UserForm) -> Result<User, UsersClientError> {
        let body = json!({
            "nombre": form.nombre,
            "email": form.email,
            "telefono": form.telefono,
        });

        let request = Request::post(&self.url("/users")).json(&body)?;
        let created: CreatedResponse = Self::send(request).await?;
        Ok(created.user)
    }

    async fn delete_user(&self, id: i32) -> Result<(), UsersClientError> {
        let response = Request::delete(&self.url(&format!("/users/{}", id)))
            .send()
            .await?;

        if response.ok() {
            Ok(())
        } else {
            Err(Self::failure(response).await)
        }
    }
}
